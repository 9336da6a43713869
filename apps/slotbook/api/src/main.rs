//! Slotbook API - event sign-ups over REST

use axum_helpers::server::{close_postgres, create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(
        max_connections = config.database.max_connections,
        "Connecting to PostgreSQL"
    );

    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await?;

    info!("Successfully connected to PostgreSQL");

    if config.run_migrations {
        database::postgres::run_migrations::<migration::Migrator>(&db, config.app.name).await?;
    }

    let state = AppState {
        config: config.clone(),
        db,
    };

    let api_routes = api::routes(&state);
    let router = create_router::<openapi::ApiDoc>(api_routes)?;
    let app = router
        .merge(health_router(state.config.app.clone()))
        .merge(api::health::ready_router(state.clone()));

    info!(
        "Starting {} v{} on port {}",
        state.config.app.name, state.config.app.version, state.config.server.port
    );

    let db = state.db.clone();
    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing PostgreSQL connections");
            close_postgres(db, "slotbook").await;
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Slotbook API shutdown complete");
    Ok(())
}
