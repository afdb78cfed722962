//! Tradehall - batch offer-matching exchange
//!
//! Main entry point. Parses CLI arguments, loads configuration, and runs
//! the periodic matcher worker until interrupted.

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::watch;
use tracing::{error, info};

use cli::{Cli, Commands};
use config::{load_config, validate_config};
use observability::logging::init_default_logging;
use trader::store::InMemoryStore;
use trader::{MatcherWorker, Trader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Start { config, interval } => {
            init_default_logging("tradehall")?;

            let mut app_config = load_config(&config)
                .with_context(|| format!("Failed to load config from {}", config.display()))?;

            let report = validate_config(&app_config);
            for warning in &report.warnings {
                tracing::warn!(field = %warning.field, "Config warning: {}", warning.message);
            }
            if !report.is_valid() {
                for err in &report.errors {
                    error!("Config error: {}", err);
                }
                anyhow::bail!("Configuration is invalid");
            }

            if let Some(seconds) = interval {
                app_config.matcher.interval_seconds = seconds;
            }

            info!(
                exchange = %app_config.exchange.name,
                version = %app_config.exchange.version,
                "Starting Tradehall"
            );

            let store = Arc::new(InMemoryStore::with_ledger(&app_config.ledger));
            let trader = Arc::new(Trader::new(store));
            let worker = MatcherWorker::new(Arc::clone(&trader), app_config.matcher.clone());

            let (shutdown_tx, shutdown_rx) = watch::channel(false);
            let worker_handle = tokio::spawn(async move {
                worker.run(shutdown_rx).await;
            });

            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for shutdown signal")?;
            info!("Shutdown signal received");

            shutdown_tx.send(true).ok();
            worker_handle.await.context("Worker task panicked")?;

            let snapshot = trader.metrics();
            info!(
                passes_run = snapshot.passes_run,
                trades_executed = snapshot.trades_executed,
                units_traded = snapshot.units_traded,
                "Tradehall stopped"
            );
            Ok(())
        }

        Commands::Validate { config } => {
            init_default_logging("tradehall")?;

            let app_config = load_config(&config)
                .with_context(|| format!("Failed to load config from {}", config.display()))?;

            let report = validate_config(&app_config);
            for warning in &report.warnings {
                println!("warning ({}): {}", warning.field, warning.message);
            }
            if report.is_valid() {
                println!("Configuration is valid");
                Ok(())
            } else {
                for err in &report.errors {
                    println!("error: {}", err);
                }
                anyhow::bail!("Configuration is invalid");
            }
        }

        Commands::Init { output } => {
            let default_config = config::generate_default_config();
            config::save_config(&default_config, &output)
                .with_context(|| format!("Failed to write config to {}", output.display()))?;
            println!("Wrote default configuration to {}", output.display());
            Ok(())
        }
    }
}
