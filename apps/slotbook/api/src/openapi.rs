//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for the Slotbook API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Slotbook API",
        version = "0.1.0",
        description = "Event sign-ups with fixed capacity, automatic waitlisting and secret-guarded deletion",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    nest(
        (path = "/api/events", api = domain_events::ApiDoc)
    )
)]
pub struct ApiDoc;
