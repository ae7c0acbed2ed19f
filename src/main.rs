use clap::Parser;
use tracing_subscriber::EnvFilter;

use flashdeck_api::cli::{self, Cli};
use flashdeck_api::config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL and JWT_SECRET are picked up
    let _ = dotenvy::dotenv();

    let config = config::config().clone();
    let default_level = if config.query.debug_logging { "flashdeck_api=debug,info" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    tracing::info!("Starting Flashdeck API in {:?} mode", config.environment);

    let cli = Cli::parse();
    if let Err(e) = cli::run(cli, config).await {
        match std::env::var("FLASHDECK_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }

    Ok(())
}
