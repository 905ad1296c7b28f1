use clap::Subcommand;
use serde_json::json;

use crate::cli::config::CliContext;
use crate::cli::utils::*;
use crate::cli::{report, OutputFormat};
use crate::models::DirectoryExpert;
use crate::routes::Route;
use crate::types::ContactMethod;
use crate::views::connection::{ConnectionRequestForm, SENT_MESSAGE};
use crate::views::directory::{DirectoryScreen, ExpertDirectory};
use crate::views::expert_detail::{ExpertDetail, ExpertScreen};
use crate::views::{PENDING_MESSAGE, PENDING_TITLE};

#[derive(Subcommand)]
pub enum ExpertsCommands {
    #[command(about = "Browse the expert directory")]
    List {
        #[arg(long, help = "Match against expertise area and offering")]
        keyword: Option<String>,
        #[arg(long, help = "Exact area of expertise")]
        area: Option<String>,
        #[arg(long, help = "Exact local group name")]
        group: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    #[command(about = "List the areas and local groups present in the directory")]
    Options,

    #[command(about = "Show one expert by user id")]
    Show {
        #[arg(help = "User id of the expert")]
        user_id: i64,
    },

    #[command(about = "Send a connection request to an expert")]
    Connect {
        #[arg(help = "Expert id")]
        expert_id: i64,
        #[arg(long, help = "At least 10 characters")]
        message: String,
        #[arg(long, help = "email, phone, video_call, in_person or other")]
        method: Option<ContactMethod>,
    },
}

pub async fn handle(cmd: ExpertsCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = CliContext::connect().await?;

    match cmd {
        ExpertsCommands::List { keyword, area, group, page } => {
            ctx.enter(Route::Experts).await?;
            let mut directory = ExpertDirectory::open(&ctx.client).await;
            directory.set_keyword(keyword);
            directory.set_area(area);
            directory.set_local_group(group);
            directory.go_to_page(page)?;

            match directory.screen() {
                DirectoryScreen::Listing { page, .. } if page.items.is_empty() => {
                    output_empty_collection(&output_format, "experts", "No experts match your filters")
                }
                DirectoryScreen::Listing { page, .. } => match output_format {
                    OutputFormat::Json => print_json(&page),
                    OutputFormat::Text => {
                        print_expert_table(&page.items);
                        println!();
                        println!("Page {} of {} ({} experts)", page.page, page.total_pages, page.total_items);
                        Ok(())
                    }
                },
                screen => print_non_listing(&output_format, &screen),
            }
        }
        ExpertsCommands::Options => {
            ctx.enter(Route::Experts).await?;
            let directory = ExpertDirectory::open(&ctx.client).await;
            if !matches!(directory.screen(), DirectoryScreen::Listing { .. }) {
                return print_non_listing(&output_format, &directory.screen());
            }
            let options = directory.options();
            match output_format {
                OutputFormat::Json => print_json(&options),
                OutputFormat::Text => {
                    println!("Areas of expertise:");
                    for area in &options.areas {
                        println!("  {}", area);
                    }
                    println!("Local groups:");
                    for group in &options.local_groups {
                        println!("  {}", group);
                    }
                    Ok(())
                }
            }
        }
        ExpertsCommands::Show { user_id } => {
            ctx.enter(Route::Expert(user_id)).await?;
            let detail = ExpertDetail::open(&ctx.client, user_id).await;
            let screen = detail.screen();
            match (&output_format, &screen) {
                (OutputFormat::Json, _) => print_json(&screen),
                (OutputFormat::Text, ExpertScreen::Profile { profile, can_send_message }) => {
                    let expert = &profile.expert;
                    println!("Expert #{} (user {})", expert.id, user_id);
                    println!("Occupation: {}", or_dash(Some(expert.occupation.as_str())));
                    println!("Industry: {}", or_dash(expert.industry_name.as_deref()));
                    println!("Availability: {}", expert.availability_status);
                    if !expert.background.trim().is_empty() {
                        println!("Background: {}", expert.background);
                    }
                    for (i, record) in profile.expertise.iter().enumerate() {
                        println!();
                        println!("Expertise {}: {}", i + 1, or_dash(record.area_of_expertise.as_deref()));
                        println!("  Offering: {}", record.what_offering);
                        if !record.who_would_benefit.is_empty() {
                            println!("  Who would benefit: {}", record.who_would_benefit);
                        }
                        if !record.why_choose_you.is_empty() {
                            println!("  Why choose me: {}", record.why_choose_you);
                        }
                        if !record.skills_not_offered.is_empty() {
                            println!("  Not offered: {}", record.skills_not_offered);
                        }
                    }
                    if *can_send_message {
                        println!();
                        println!("Send a message: mdir experts connect {} --message \"...\"", expert.id);
                    }
                    Ok(())
                }
                (OutputFormat::Text, ExpertScreen::PendingVerification { title, message }) => {
                    println!("{}", title);
                    println!("{}", message);
                    Ok(())
                }
                (OutputFormat::Text, ExpertScreen::Error { message }) => Err(anyhow::anyhow!("{}", message)),
                (OutputFormat::Text, ExpertScreen::Loading) => Ok(()),
            }
        }
        ExpertsCommands::Connect { expert_id, message, method } => {
            ctx.enter(Route::Experts).await?;
            if ctx.session().user().await.map(|u| u.is_pending()).unwrap_or(false) {
                return Err(anyhow::anyhow!("{}: {}", PENDING_TITLE, PENDING_MESSAGE));
            }
            let mut form = ConnectionRequestForm::new(expert_id);
            form.message = message;
            form.preferred_contact_method = method;
            form.submit(&ctx.client).await.map_err(|e| report(&ctx, &output_format, e))?;
            output_success(&output_format, SENT_MESSAGE, Some(json!({ "expert_id": expert_id })))
        }
    }
}

fn print_expert_table(experts: &[DirectoryExpert]) {
    println!("{:<8} {:<26} {:<22} {:<18} {}", "USER", "NAME", "OCCUPATION", "LOCAL GROUP", "EXPERTISE");
    println!("{}", "-".repeat(100));
    for expert in experts {
        let areas: Vec<&str> = expert.expertise.iter().filter_map(|e| e.area_of_expertise.as_deref()).collect();
        println!(
            "{:<8} {:<26} {:<22} {:<18} {}",
            expert.user_id,
            clip(&expert.full_name(), 26),
            clip(or_dash(Some(expert.occupation.as_str())), 22),
            clip(or_dash(expert.local_group_name.as_deref()), 18),
            areas.join(", ")
        );
    }
}

fn print_non_listing(output_format: &OutputFormat, screen: &DirectoryScreen) -> anyhow::Result<()> {
    match (output_format, screen) {
        (OutputFormat::Json, _) => print_json(screen),
        (OutputFormat::Text, DirectoryScreen::PendingVerification { title, message }) => {
            println!("{}", title);
            println!("{}", message);
            println!("Complete your profile with: mdir profile show");
            Ok(())
        }
        (OutputFormat::Text, DirectoryScreen::Error { message }) => Err(anyhow::anyhow!("{}", message)),
        (OutputFormat::Text, _) => Ok(()),
    }
}
