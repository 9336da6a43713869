//! Connection cleanup run after the listener stops accepting requests.

use tracing::{error, info};

/// Close a SeaORM pool, logging the outcome under `name`.
///
/// Dropping the pool also closes it; closing explicitly lets shutdown wait for it.
pub async fn close_postgres(db: sea_orm::DatabaseConnection, name: &str) {
    match db.close().await {
        Ok(_) => info!(pool = name, "PostgreSQL connection closed"),
        Err(e) => error!(pool = name, error = %e, "Error closing PostgreSQL connection"),
    }
}
