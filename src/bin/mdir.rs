use clap::Parser;
use member_directory::cli::Cli;
use member_directory::config::config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so MDIR_API_URL and friends apply
    let _ = dotenvy::dotenv();

    let default_filter = if member_directory::is_development!() && config().logging.debug_logging {
        format!("{},member_directory=debug", config().logging.filter)
    } else {
        config().logging.filter.clone()
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!("mdir starting in {:?} mode against {}", config().environment, config().api.base_url);

    let cli = Cli::parse();

    if let Err(e) = member_directory::cli::run(cli).await {
        match std::env::var("MDIR_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }

    Ok(())
}
