pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use config::CliContext;

#[derive(Parser)]
#[command(name = "mdir")]
#[command(about = "mdir - Command-line client for the member expert directory")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Authentication and token management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Register a new member account")]
    Register(commands::register::RegisterArgs),

    #[command(about = "Password reset")]
    Password {
        #[command(subcommand)]
        cmd: commands::password::PasswordCommands,
    },

    #[command(about = "Browse and contact experts")]
    Experts {
        #[command(subcommand)]
        cmd: commands::experts::ExpertsCommands,
    },

    #[command(about = "View and edit your profile")]
    Profile {
        #[command(subcommand)]
        cmd: commands::profile::ProfileCommands,
    },

    #[command(about = "Administration (admin role required)")]
    Admin {
        #[command(subcommand)]
        cmd: commands::admin::AdminCommands,
    },

    #[command(about = "Show where a front-end path leads for the current session")]
    Route {
        #[arg(help = "Path such as /experts or /user/12")]
        path: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Print an API failure (with field messages) and turn it into the
/// command's error, adding a login hint when the session was dropped.
pub fn report(ctx: &CliContext, output_format: &OutputFormat, err: ApiError) -> anyhow::Error {
    if let Err(print_err) = utils::output_api_error(output_format, &err) {
        tracing::error!("failed to print error: {}", print_err);
    }
    match ctx.login_hint() {
        Some(hint) => anyhow::anyhow!("{}", hint),
        None => anyhow::Error::new(err),
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, output_format).await,
        Commands::Register(args) => commands::register::handle(args, output_format).await,
        Commands::Password { cmd } => commands::password::handle(cmd, output_format).await,
        Commands::Experts { cmd } => commands::experts::handle(cmd, output_format).await,
        Commands::Profile { cmd } => commands::profile::handle(cmd, output_format).await,
        Commands::Admin { cmd } => commands::admin::handle(cmd, output_format).await,
        Commands::Route { path } => commands::route::handle(path, output_format).await,
    }
}
