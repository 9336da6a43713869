use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Install color-eyre before anything fallible runs in `main`.
///
/// Shows the error location, hides the environment section. Repeated calls are no-ops.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Directives used when `RUST_LOG` is unset.
pub fn default_filter(environment: &Environment) -> &'static str {
    if environment.is_production() {
        "info,sea_orm=warn,sqlx=warn"
    } else {
        "debug,sqlx=info,hyper=info"
    }
}

/// Initialize the global subscriber.
///
/// - **Production**: flattened JSON events, no module targets.
/// - **Development**: pretty, multi-line output.
///
/// Both install `tracing_error::ErrorLayer` so color-eyre reports carry span traces.
/// `RUST_LOG` overrides [`default_filter`]. Safe to call more than once; later calls
/// leave the first subscriber in place.
pub fn init_tracing(environment: &Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(environment)));

    let result = if environment.is_production() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(_) => info!(environment = ?environment, "Tracing initialized"),
        Err(_) => debug!("Tracing already initialized, skipping re-initialization"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_per_environment() {
        assert!(default_filter(&Environment::Production).starts_with("info"));
        assert!(default_filter(&Environment::Development).starts_with("debug"));
    }

    #[test]
    fn test_init_tracing_multiple_calls() {
        init_tracing(&Environment::Development);
        init_tracing(&Environment::Production);
    }

    #[test]
    fn test_init_tracing_with_rust_log_env() {
        temp_env::with_var("RUST_LOG", Some("warn"), || {
            init_tracing(&Environment::Production);
        });
    }
}
