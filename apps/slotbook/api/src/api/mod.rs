//! API routes module

pub mod events;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Routes nested under `/api`
pub fn routes(state: &AppState) -> Router {
    Router::new().nest("/events", events::router(state))
}
