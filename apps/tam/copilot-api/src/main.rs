//! TAM Co-Pilot API
//!
//! Serves the Co-Pilot endpoints, runs the daily cost aggregation once, or
//! keeps it on a cron schedule.

use axum_helpers::server::{close_postgres, create_production_app};
use clap::{Parser, Subcommand};
use core_config::tracing::{init_tracing, install_color_eyre};
use eyre::Result;
use sea_orm::DatabaseConnection;
use tracing::info;

mod api;
mod config;
mod openapi;
mod scheduler;
mod state;

use config::Config;
use state::AppState;

#[derive(Parser)]
#[command(name = "copilot-api")]
#[command(about = "TAM Co-Pilot: platform health, support cases, QBR data and daily cost aggregation")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Aggregate yesterday's billing export once and exit
    Aggregate,

    /// Run the daily aggregation on a cron schedule
    Schedule {
        /// Cron expression, seconds first. Defaults to AGGREGATION_CRON.
        #[arg(short, long)]
        cron: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let cli = Cli::parse();

    // Load configuration from environment variables
    let config = Config::from_env()?;
    init_tracing(&config.environment);

    observability::init_metrics()?;

    let db = connect(&config).await?;
    let state = AppState::new(config, db)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(state).await,
        Commands::Aggregate => {
            info!("Starting one-time daily aggregation");
            let result = state.tam.aggregator.run().await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            close_postgres(state.db, "warehouse").await;
            Ok(())
        }
        Commands::Schedule { cron } => {
            let cron = cron.unwrap_or_else(|| state.config.aggregation_cron.clone());
            scheduler::run_scheduled(state.tam.aggregator.clone(), &cron).await?;
            close_postgres(state.db, "warehouse").await;
            Ok(())
        }
    }
}

async fn connect(config: &Config) -> Result<DatabaseConnection> {
    info!("Connecting to database...");
    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    database::postgres::run_migrations::<migration::Migrator>(&db, config.app.name)
        .await
        .map_err(|e| eyre::eyre!("Migrations failed: {}", e))?;

    Ok(db)
}

async fn serve(state: AppState) -> Result<()> {
    let app = api::app(&state)?;

    info!(
        name = state.config.app.name,
        version = state.config.app.version,
        "Starting TAM Co-Pilot API"
    );

    let server = state.config.server.clone();
    let shutdown_timeout = state.config.shutdown_timeout;
    create_production_app(app, &server, shutdown_timeout, async move {
        close_postgres(state.db, "warehouse").await;
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("TAM Co-Pilot API shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults_to_serve() {
        let cli = Cli::try_parse_from(["copilot-api"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_schedule_accepts_cron_override() {
        let cli = Cli::try_parse_from(["copilot-api", "schedule", "--cron", "0 0 3 * * *"]).unwrap();
        match cli.command {
            Some(Commands::Schedule { cron }) => assert_eq!(cron.as_deref(), Some("0 0 3 * * *")),
            _ => panic!("expected schedule"),
        }
    }
}
