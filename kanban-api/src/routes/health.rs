/// Health check endpoint
///
/// ```text
/// GET /health
/// ```
///
/// Answers 200 when the database responds and every embedded migration is
/// applied, 503 otherwise:
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected",
///   "migrations": "up_to_date"
/// }
/// ```

use crate::app::AppState;
use axum::{extract::State, http::StatusCode, Json};
use kanban_shared::db::migrations::{get_migration_status, MigrationStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,

    /// `up_to_date`, `pending` or `unknown` when the database is unreachable
    pub migrations: String,
}

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let status = get_migration_status(&state.db).await;
    if let Err(e) = &status {
        tracing::warn!(error = %e, "Database health check failed");
    }

    let (code, body) = report(status.ok());
    (code, Json(body))
}

fn report(migrations: Option<MigrationStatus>) -> (StatusCode, HealthResponse) {
    let (code, database, migrations) = match migrations {
        Some(status) if status.is_up_to_date() => (StatusCode::OK, "connected", "up_to_date"),
        Some(status) => {
            tracing::warn!(
                applied = status.applied_migrations,
                known = status.known_migrations,
                "Database schema is behind"
            );
            (StatusCode::SERVICE_UNAVAILABLE, "connected", "pending")
        }
        None => (StatusCode::SERVICE_UNAVAILABLE, "disconnected", "unknown"),
    };

    let body = HealthResponse {
        status: if code == StatusCode::OK { "healthy" } else { "degraded" }.to_string(),
        version: kanban_shared::VERSION.to_string(),
        database: database.to_string(),
        migrations: migrations.to_string(),
    };

    (code, body)
}
