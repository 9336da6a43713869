use axum::http::{HeaderValue, Method, header};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;

pub const CORS_ENV_VAR: &str = "CORS_ALLOWED_ORIGIN";

/// Builds the CORS layer from a comma-separated origin list.
///
/// `*` allows any origin. Browsers refuse credentials with a wildcard origin,
/// so that mode never sets `Access-Control-Allow-Credentials`.
///
/// - Methods: GET, POST, DELETE, OPTIONS
/// - Headers: Content-Type, Accept
/// - Max age: 1 hour
pub fn create_cors_layer(origins: &str) -> io::Result<CorsLayer> {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600));

    if origins.trim() == "*" {
        return Ok(base.allow_origin(Any));
    }

    let allowed: Vec<HeaderValue> = origins
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<HeaderValue>())
        .collect::<Result<_, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid {} value: {}", CORS_ENV_VAR, e),
            )
        })?;

    if allowed.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} cannot be empty", CORS_ENV_VAR),
        ));
    }

    Ok(base
        .allow_origin(AllowOrigin::list(allowed))
        .allow_credentials(true))
}

/// Reads `CORS_ALLOWED_ORIGIN` (required) and builds the layer.
///
/// Examples: `http://localhost:5173`, `https://a.example,https://b.example`, `*`.
pub fn cors_layer_from_env() -> io::Result<CorsLayer> {
    let origins = std::env::var(CORS_ENV_VAR).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "{} environment variable is required. Example: {}=http://localhost:5173",
                CORS_ENV_VAR, CORS_ENV_VAR
            ),
        )
    })?;

    let layer = create_cors_layer(&origins)?;
    info!(origins = %origins, "CORS configured");
    Ok(layer)
}
