use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AuditEvent, AuditOutcome, IdPath, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, ServiceUnavailableResponse,
    },
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{EventError, EventResult};
use crate::models::{
    CreateEvent, CreatedEvent, DeleteEvent, DeletedEvent, Event, Placement, RegisterParticipant,
    Registrant, RegistrationResponse,
};
use crate::repository::EventRepository;
use crate::service::EventService;

pub const TAG: &str = "events";

/// OpenAPI documentation for the Events API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_events,
        create_event,
        get_event,
        delete_event,
        list_participants,
        register_participant,
        list_reservations,
    ),
    components(
        schemas(
            Event,
            Registrant,
            CreateEvent,
            CreatedEvent,
            RegisterParticipant,
            RegistrationResponse,
            DeleteEvent,
            DeletedEvent
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            ForbiddenResponse,
            ServiceUnavailableResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Event sign-up endpoints")
    )
)]
pub struct ApiDoc;

/// Router for `/events`; nest it under the desired prefix
pub fn router<R: EventRepository + 'static>(service: EventService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_events).post(create_event))
        .route("/{id}", get(get_event).delete(delete_event))
        .route(
            "/{id}/participants",
            get(list_participants).post(register_participant),
        )
        .route("/{id}/reservations", get(list_reservations))
        .with_state(shared_service)
}

/// List all events
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "All events, oldest first", body = Vec<Event>),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn list_events<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
) -> EventResult<Json<Vec<Event>>> {
    let events = service.list_events().await?;
    Ok(Json(events))
}

/// Create an event
///
/// The response carries the deletion secret. It is not retrievable later.
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateEvent,
    responses(
        (status = 201, description = "Event created", body = CreatedEvent),
        (status = 400, response = BadRequestValidationResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn create_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateEvent>,
) -> EventResult<impl IntoResponse> {
    let name = input.name.clone();
    let max_slots = input.max_slots;
    let created = service.create_event(input).await?;

    AuditEvent::new(
        "event.create",
        Some(format!("event:{}", created.id)),
        AuditOutcome::Success,
    )
    .with_request_headers(&headers)
    .with_details(json!({
        "name": name,
        "max_slots": max_slots,
    }))
    .log();

    Ok((StatusCode::CREATED, Json(created)))
}

/// Get an event by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn get_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    IdPath(id): IdPath,
) -> EventResult<Json<Event>> {
    let event = service.get_event(id).await?;
    Ok(Json(event))
}

/// Delete an event with its participants and reservations
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Event ID")
    ),
    request_body = DeleteEvent,
    responses(
        (status = 200, description = "Event deleted", body = DeletedEvent),
        (status = 400, response = BadRequestIdResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn delete_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    headers: HeaderMap,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<DeleteEvent>,
) -> EventResult<Json<DeletedEvent>> {
    let resource = Some(format!("event:{}", id));

    match service.delete_event(id, &input.password).await {
        Ok(()) => {
            AuditEvent::new("event.delete", resource, AuditOutcome::Success)
                .with_request_headers(&headers)
                .log();
            Ok(Json(DeletedEvent::default()))
        }
        Err(err @ EventError::Forbidden(_)) => {
            AuditEvent::new("event.delete", resource, AuditOutcome::Denied)
                .with_request_headers(&headers)
                .with_details(json!({"reason": "secret_mismatch"}))
                .log();
            Err(err)
        }
        Err(err) => Err(err),
    }
}

/// List confirmed participants of an event
#[utoipa::path(
    get,
    path = "/{id}/participants",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Participants in arrival order, empty for unknown events", body = Vec<Registrant>),
        (status = 400, response = BadRequestIdResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn list_participants<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    IdPath(id): IdPath,
) -> EventResult<Json<Vec<Registrant>>> {
    let participants = service.list_participants(id).await?;
    Ok(Json(participants))
}

/// Register for an event
///
/// `201 {id}` while slots remain, `202 {message}` once the event is full.
#[utoipa::path(
    post,
    path = "/{id}/participants",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Event ID")
    ),
    request_body = RegisterParticipant,
    responses(
        (status = 201, description = "Confirmed participant", body = RegistrationResponse,
            example = json!({"id": 1})),
        (status = 202, description = "Added to the waitlist", body = RegistrationResponse,
            example = json!({"message": "Added to reservation list"})),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn register_participant<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<RegisterParticipant>,
) -> EventResult<impl IntoResponse> {
    let placement = service.register(id, input).await?;

    let status = match placement {
        Placement::Confirmed(_) => StatusCode::CREATED,
        Placement::Waitlisted => StatusCode::ACCEPTED,
    };

    Ok((status, Json(RegistrationResponse::from(placement))))
}

/// List waitlisted registrants of an event
#[utoipa::path(
    get,
    path = "/{id}/reservations",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Reservations in arrival order, empty for unknown events", body = Vec<Registrant>),
        (status = 400, response = BadRequestIdResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn list_reservations<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    IdPath(id): IdPath,
) -> EventResult<Json<Vec<Registrant>>> {
    let reservations = service.list_reservations(id).await?;
    Ok(Json(reservations))
}
