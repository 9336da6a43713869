//! Database connectivity for the slotbook services.
//!
//! # Features
//!
//! - `postgres` (default) - PostgreSQL through SeaORM: pool setup, retrying connect,
//!   readiness probe and migration runner
//! - `config` - `core_config::FromEnv` for [`postgres::PostgresConfig`]
//!
//! ```ignore
//! use database::postgres;
//! use migration::Migrator;
//!
//! let db = postgres::connect_from_config_with_retry(config, None).await?;
//! postgres::run_migrations::<Migrator>(&db, "slotbook_api").await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult};
