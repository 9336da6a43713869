use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use super::PostgresConfig;
use crate::common::{RetryConfig, retry, retry_with_backoff};

pub async fn connect_with_options(options: ConnectOptions) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(options).await?;
    info!("Connected to PostgreSQL");
    Ok(db)
}

/// Connect, retrying with exponential backoff.
///
/// `None` uses [`RetryConfig::default`]. The database often comes up after the
/// service in local compose setups, so startup should not fail on the first refusal.
pub async fn connect_from_config_with_retry(
    config: PostgresConfig,
    retry_config: Option<RetryConfig>,
) -> Result<DatabaseConnection, DbErr> {
    let options = config.into_connect_options();
    let attempt = || connect_with_options(options.clone());

    match retry_config {
        Some(policy) => retry_with_backoff(attempt, policy).await,
        None => retry(attempt).await,
    }
}

/// Apply every pending migration of `M`.
pub async fn run_migrations<M: MigratorTrait>(
    db: &DatabaseConnection,
    app_name: &str,
) -> Result<(), DbErr> {
    info!(app = app_name, "Running database migrations");
    M::up(db, None).await?;
    info!(app = app_name, "Migrations complete");
    Ok(())
}
