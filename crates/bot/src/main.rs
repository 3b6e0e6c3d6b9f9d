//! GotValis bot binary.
//!
//! Composition root that assembles:
//! 1. Configuration from the environment (and `.env`)
//! 2. Logging to stderr and a daily log file
//! 3. The JSON file entity store and optional item catalog override
//! 4. The runtime, with its tick worker
//! 5. A consumer turning tick events into channel notifications
//!
//! The Discord command surface plugs in through [`RuntimeHandle`]; it is not
//! part of this binary.
//!
//! [`RuntimeHandle`]: gotvalis_runtime::RuntimeHandle

mod config;
mod logging;
mod notifier;

use std::sync::Arc;

use anyhow::{Context, Result};
use gotvalis_content::ItemLoader;
use gotvalis_runtime::{FileEntityStore, ItemOracleImpl, Runtime, Topic};

use crate::config::BotConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = BotConfig::from_env();
    let _log_guard = logging::setup_logging(&config.log_dir)?;

    tracing::info!("Starting GotValis");
    tracing::info!("Entity store: {}", config.data_dir.display());
    tracing::info!("Tick interval: {}s", config.tick_interval.as_secs());

    let store = FileEntityStore::new(&config.data_dir)
        .await
        .with_context(|| format!("cannot open entity store {}", config.data_dir.display()))?;

    let mut builder = Runtime::builder()
        .config(config.runtime_config())
        .store(Arc::new(store));
    if let Some(path) = &config.items_file {
        let items = ItemLoader::load(path)?;
        tracing::info!("Item catalog: {} ({} items)", path.display(), items.len());
        builder = builder.items(Arc::new(ItemOracleImpl::from_definitions(items)));
    }

    let runtime = builder.build().await?;
    let notifications = tokio::spawn(notifier::run(runtime.handle().subscribe(Topic::Effects)));

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    tracing::info!("Shutdown requested");

    runtime.shutdown().await?;
    notifications.abort();

    tracing::info!("GotValis stopped");
    Ok(())
}
