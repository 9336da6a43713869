//! Readiness probe

use axum::{Router, routing::get};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use database::postgres::check_health;

use crate::state::AppState;

/// `/ready`: 200 while PostgreSQL answers `SELECT 1`, 503 otherwise
pub fn ready_router(state: AppState) -> Router {
    Router::new().route(
        "/ready",
        get(move || {
            let db = state.db.clone();
            async move {
                let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
                    "database",
                    Box::pin(async { check_health(&db).await.map_err(|e| e.to_string()) }),
                )];
                run_health_checks(checks).await
            }
        }),
    )
}
