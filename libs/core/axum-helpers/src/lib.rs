//! # Axum Helpers
//!
//! Shared building blocks for the slotbook HTTP services.
//!
//! - **[`server`]**: router assembly with OpenAPI viewers, health probes, graceful shutdown
//! - **[`http`]**: CORS and security header middleware
//! - **[`errors`]**: [`AppError`] and the [`ErrorResponse`] body with stable [`ErrorCode`]s
//! - **[`extractors`]**: [`IdPath`] and [`ValidatedJson`]
//! - **[`audit`]**: structured audit events
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//!
//! let router = create_router::<ApiDoc>(api_routes)?.merge(health_router(app_info!()));
//! create_production_app(router, &config.server, Duration::from_secs(30), async {}).await?;
//! ```

pub mod audit;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, close_postgres,
    create_production_app, create_router, health_router, run_health_checks, shutdown_signal,
};

pub use http::{cors_layer_from_env, create_cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{IdPath, ValidatedJson};

pub use audit::{AuditEvent, AuditOutcome, extract_ip_from_headers, extract_user_agent};
