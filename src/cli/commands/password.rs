use clap::Subcommand;
use serde_json::json;

use crate::cli::config::CliContext;
use crate::cli::utils::*;
use crate::cli::{report, OutputFormat};
use crate::views::password_reset::{ResetConfirmForm, ResetRequestForm, RESET_COMPLETE};

#[derive(Subcommand)]
pub enum PasswordCommands {
    #[command(about = "Email a password reset link")]
    Request {
        #[arg(help = "Account email")]
        email: String,
    },

    #[command(about = "Set a new password from a reset link")]
    Confirm {
        #[arg(help = "uid from the reset link")]
        uid: String,
        #[arg(help = "token from the reset link")]
        token: String,
        #[arg(long, help = "New password (will prompt if not provided)")]
        password: Option<String>,
    },
}

pub async fn handle(cmd: PasswordCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = CliContext::connect().await?;

    match cmd {
        PasswordCommands::Request { email } => {
            let mut form = ResetRequestForm { email, ..Default::default() };
            let message = form.submit(&ctx.client).await.map_err(|e| report(&ctx, &output_format, e))?;
            output_success(&output_format, message, None)
        }
        PasswordCommands::Confirm { uid, token, password } => {
            let mut form = ResetConfirmForm::new(uid, token);
            match password {
                Some(password) => {
                    form.confirm_password = password.clone();
                    form.new_password = password;
                }
                None => {
                    form.new_password = prompt_line("New password: ")?;
                    form.confirm_password = prompt_line("Confirm new password: ")?;
                }
            }
            let next = form.submit(&ctx.client).await.map_err(|e| report(&ctx, &output_format, e))?;
            output_success(&output_format, RESET_COMPLETE, Some(json!({ "redirect": next.path() })))
        }
    }
}
