use clap::Args;
use serde_json::json;

use crate::cli::config::CliContext;
use crate::cli::utils::*;
use crate::cli::{report, OutputFormat};
use crate::models::ExpertiseDraft;
use crate::types::Availability;
use crate::views::registration::{RegistrationFlow, COMPLETE_MESSAGE};

#[derive(Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, default_value = "", help = "US phone number, any format")]
    pub phone: String,
    #[arg(long)]
    pub member_id: String,
    #[arg(long)]
    pub city: String,
    #[arg(long, help = "Two-letter state code")]
    pub state: String,
    #[arg(long, help = "Local group id (see 'mdir admin groups list')")]
    pub local_group: Option<i64>,
    #[arg(long, help = "Password (will prompt if not provided)")]
    pub password: Option<String>,
    #[arg(long, help = "Defaults to --password when that is given")]
    pub confirm_password: Option<String>,

    #[arg(long, help = "Skip the optional expert profile step")]
    pub skip_expert: bool,
    #[arg(long, default_value = "")]
    pub occupation: String,
    #[arg(long)]
    pub industry: Option<i64>,
    #[arg(long, default_value = "")]
    pub background: String,
    #[arg(long, default_value = "available")]
    pub availability: Availability,
    #[arg(long = "offering", help = "What you offer (repeat up to 3 times)")]
    pub offerings: Vec<String>,
}

pub async fn handle(args: RegisterArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = CliContext::connect().await?;
    let (password, confirm_password) = match args.password {
        Some(password) => {
            let confirm = args.confirm_password.unwrap_or_else(|| password.clone());
            (password, confirm)
        }
        None => (prompt_line("Password: ")?, prompt_line("Confirm password: ")?),
    };

    let mut flow = RegistrationFlow::new();
    flow.form.first_name = args.first_name;
    flow.form.last_name = args.last_name;
    flow.form.email = args.email.clone();
    flow.form.phone = args.phone;
    flow.form.member_id = args.member_id;
    flow.form.city = args.city;
    flow.form.state = args.state;
    flow.form.local_group = args.local_group;
    flow.form.password = password;
    flow.form.confirm_password = confirm_password;

    flow.submit_details(&ctx.client).await.map_err(|e| report(&ctx, &output_format, e))?;

    let route = if args.skip_expert {
        flow.skip_expert_profile()
    } else {
        flow.expert.occupation = args.occupation;
        flow.expert.industry = args.industry;
        flow.expert.background = args.background;
        flow.expert.availability_status = args.availability;
        for offering in args.offerings {
            if !flow.expert.add_expertise() {
                tracing::warn!("ignoring expertise beyond the maximum of three");
                break;
            }
            if let Some(last) = flow.expert.expertise.last_mut() {
                *last = ExpertiseDraft { what_offering: offering, ..Default::default() };
            }
        }
        flow.submit_expert_profile(&ctx.client).await.map_err(|e| report(&ctx, &output_format, e))?
    };

    output_success(
        &output_format,
        COMPLETE_MESSAGE,
        Some(json!({ "email": args.email, "redirect": route.path() })),
    )
}
