use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::AppConfig;
use crate::database::{DatabaseManager, PgStore};
use crate::routes;
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "flashdeck")]
#[command(about = "Flashdeck - flashcard set API server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP API")]
    Serve {
        #[arg(long, help = "Port to listen on (defaults to the configured port)")]
        port: Option<u16>,
    },

    #[command(about = "Apply pending database migrations and exit")]
    Migrate,
}

pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { port } => serve(config, port).await,
        Commands::Migrate => {
            let pool = DatabaseManager::connect(&config.database).await?;
            DatabaseManager::migrate(&pool).await?;
            Ok(())
        }
    }
}

async fn serve(config: AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to the database")?;
    if config.database.run_migrations {
        DatabaseManager::migrate(&pool).await?;
    }

    let store = PgStore::new(pool)
        .with_slow_query_threshold(Duration::from_millis(config.database.slow_query_threshold_ms));
    let port = port.unwrap_or(config.api.port);
    let state = AppState::new(Arc::new(store), config).context("invalid security configuration")?;

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Flashdeck API listening on http://{}", bind_addr);
    axum::serve(listener, routes::app(state)).await?;
    Ok(())
}
