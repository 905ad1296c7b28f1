use clap::Subcommand;
use serde_json::json;

use crate::cli::config::{load_cli_state, save_cli_state, CliContext};
use crate::cli::utils::*;
use crate::cli::{report, OutputFormat};
use crate::views::login::{logout, LoginForm};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Log in with username or email")]
    Login {
        #[arg(help = "Username or email")]
        identifier: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Forget the stored session")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,

    #[command(about = "Exchange the refresh token for a new access token")]
    Refresh,

    #[command(about = "Show current user information")]
    Whoami,
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = CliContext::connect().await?;

    match cmd {
        AuthCommands::Login { identifier, password } => {
            let password = password_or_prompt(password, "Password: ")?;
            let mut form = LoginForm::new(identifier.clone(), password);
            let landing = form
                .submit(&ctx.client, ctx.navigator.as_ref())
                .await
                .map_err(|e| report(&ctx, &output_format, e))?;

            let mut state = load_cli_state()?;
            state.record_login(&identifier);
            save_cli_state(&state)?;

            let user = ctx.session().user().await;
            output_success(
                &output_format,
                &format!("Logged in as {}", identifier),
                Some(json!({ "user": user, "redirect": landing.path() })),
            )
        }
        AuthCommands::Logout => {
            let route = logout(&ctx.client, ctx.navigator.as_ref()).await;
            output_success(&output_format, "Logged out", Some(json!({ "redirect": route.path() })))
        }
        AuthCommands::Status => {
            let session = ctx.session().session().await;
            let claims = ctx.session().access_claims().await;
            let state = load_cli_state()?;
            let has_refresh = ctx.session().has_refresh_token().await;

            match output_format {
                OutputFormat::Json => print_json(&json!({
                    "authenticated": session.is_authenticated(),
                    "user": session.user,
                    "has_refresh_token": has_refresh,
                    "access_expires_at": claims.as_ref().and_then(|c| c.expires_at()),
                    "access_expired": claims.as_ref().map(|c| c.is_expired()),
                    "last_login": state.last_login,
                })),
                OutputFormat::Text => {
                    match &session.user {
                        Some(user) => println!("Logged in as {} <{}> ({}, {})", user.full_name(), user.email, user.role, user.status),
                        None => println!("Not logged in"),
                    }
                    if let Some(expires) = claims.as_ref().and_then(|c| c.expires_at()) {
                        let marker = if claims.as_ref().map(|c| c.is_expired()).unwrap_or(false) { " (expired)" } else { "" };
                        println!("Access token expires: {}{}", expires.format("%Y-%m-%d %H:%M:%S UTC"), marker);
                    }
                    println!("Refresh token: {}", if has_refresh { "present" } else { "none" });
                    if let (Some(who), Some(at)) = (state.last_identifier, state.last_login) {
                        println!("Last login: {} at {}", who, at.format("%Y-%m-%d %H:%M"));
                    }
                    Ok(())
                }
            }
        }
        AuthCommands::Refresh => {
            ctx.session().refresh_access_token().await.map_err(|e| report(&ctx, &output_format, e))?;
            let expires = ctx.session().access_claims().await.and_then(|c| c.expires_at());
            output_success(&output_format, "Access token refreshed", Some(json!({ "expires_at": expires })))
        }
        AuthCommands::Whoami => {
            let user = ctx.client.current_user().await.map_err(|e| report(&ctx, &output_format, e))?;
            match output_format {
                OutputFormat::Json => print_json(&user),
                OutputFormat::Text => {
                    println!("ID: {}", user.id);
                    println!("Name: {}", user.full_name());
                    println!("Email: {}", user.email);
                    println!("Role: {}", user.role);
                    println!("Status: {}", user.status);
                    println!("Expert: {}", if user.is_expert { "yes" } else { "no" });
                    println!("Local group: {}", or_dash(user.local_group_name.as_deref()));
                    Ok(())
                }
            }
        }
    }
}
