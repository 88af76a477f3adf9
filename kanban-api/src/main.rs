//! # Kanban API Server
//!
//! REST API for boards, tasks and labels, account management with emailed
//! links, image uploads and a WebSocket gateway that pushes board changes to
//! connected clients.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p kanban-api
//! ```

use std::sync::Arc;

use anyhow::Context;
use kanban_api::{
    app::{build_router, AppState},
    config::Config,
    mailer::{LogMailer, Mailer, SmtpMailer},
};
use kanban_shared::db::{
    migrations::run_migrations,
    pool::{create_pool, DatabaseConfig},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kanban_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Kanban API Server v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env().context("Invalid configuration")?;

    let pool = create_pool(
        DatabaseConfig::new(config.database.url.clone())
            .with_max_connections(config.database.max_connections),
    )
    .await
    .context("Failed to connect to database")?;

    run_migrations(&pool).await.context("Failed to run migrations")?;

    let mailer: Arc<dyn Mailer> = if config.mailer.send_email {
        Arc::new(SmtpMailer::new(&config.mailer).context("Invalid mailer configuration")?)
    } else {
        Arc::new(LogMailer)
    };
    tracing::info!(mailer = mailer.name(), "Mailer ready");

    if config.push.is_none() {
        tracing::warn!("VAPID keys not configured, push subscriptions will not receive reminders");
    }

    let address = config.bind_address();
    let app = build_router(AppState::new(pool, config, mailer));

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!("Server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
