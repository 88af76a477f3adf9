//! # Kanban Reminder Worker
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p kanban-worker
//! ```

use std::sync::Arc;

use anyhow::Context;
use kanban_shared::db::{
    migrations::run_migrations,
    pool::{create_pool, DatabaseConfig},
};
use kanban_shared::push::{VapidKeys, WebPushSender};
use kanban_worker::{
    config::WorkerConfig,
    dispatcher::{DispatcherConfig, ReminderDispatcher},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kanban_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Kanban Worker v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = WorkerConfig::from_env().context("Invalid configuration")?;

    let pool = create_pool(
        DatabaseConfig::new(config.database_url.clone())
            .with_max_connections(config.max_connections),
    )
    .await
    .context("Failed to connect to database")?;

    run_migrations(&pool).await.context("Failed to run migrations")?;

    let keys = VapidKeys::from_base64(
        &config.vapid_public_key,
        &config.vapid_private_key,
        &config.vapid_subject,
    )
    .context("Invalid VAPID keys")?;
    let sender = WebPushSender::new(keys).context("Failed to build push client")?;

    let dispatcher = ReminderDispatcher::new(pool, Arc::new(sender), DispatcherConfig::from(&config));

    let shutdown = dispatcher.shutdown_token();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            return;
        }
        tracing::info!("Shutdown signal received, finishing current scan...");
        shutdown.cancel();
    });

    dispatcher.run().await;

    tracing::info!("Worker stopped");
    Ok(())
}
