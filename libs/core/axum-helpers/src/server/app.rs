use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use crate::http::{cors_layer_from_env, security_headers};
use axum::{Router, middleware};
use core_config::server::ServerConfig;
use std::future::Future;
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;

/// Wraps the API routes with documentation and cross-cutting middleware.
///
/// - OpenAPI JSON at `/api-docs/openapi.json`, viewers at `/scalar`, `/redoc`, `/rapidoc`
/// - API routes nested under `/api`
/// - JSON 404 fallback
/// - Request tracing, security headers, CORS and response compression
///
/// `apis` must already have its state applied. Health routes are merged by the caller.
///
/// # Errors
/// Fails when `CORS_ALLOWED_ORIGIN` is missing, empty or not a valid header value.
pub fn create_router<T>(apis: Router) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    use axum::Json;
    use axum::routing::get;
    use utoipa_rapidoc::RapiDoc;
    use utoipa_redoc::{Redoc, Servable as RedocServable};
    use utoipa_scalar::{Scalar, Servable as ScalarServable};

    let cors_layer = cors_layer_from_env()?;
    let spec = T::openapi();
    let spec_json = spec.clone();

    let router = Router::new()
        .route(
            "/api-docs/openapi.json",
            get(move || {
                let spec = spec_json.clone();
                async move { Json(spec) }
            }),
        )
        .merge(Redoc::with_url("/redoc", spec.clone()))
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", spec))
        .nest("/api", apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(cors_layer)
        .layer(CompressionLayer::new());

    Ok(router)
}

/// Serves `router` until SIGINT/SIGTERM, then runs `cleanup` with a deadline.
///
/// In-flight requests finish before `axum::serve` returns. `cleanup` (closing pools)
/// is abandoned with a warning if it outlives `shutdown_timeout`.
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (coordinator, _rx) = ShutdownCoordinator::new();
    let cleanup_signal = coordinator.clone();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let cleanup_handle = tokio::spawn(async move {
        cleanup_signal.wait_for_signal().await;

        info!(timeout = ?shutdown_timeout, "Starting cleanup");
        match tokio::time::timeout(shutdown_timeout, cleanup).await {
            Ok(_) => info!("Cleanup completed"),
            Err(_) => tracing::warn!(
                timeout = ?shutdown_timeout,
                "Cleanup exceeded timeout, forcing shutdown"
            ),
        }
    });

    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { coordinator.wait_for_signal().await })
        .await
        .inspect_err(|e| tracing::error!("Server encountered an error: {:?}", e));

    cleanup_handle.await.ok();

    serve_result
}
