//! Handler tests for the Events domain
//!
//! Drive the events router in-process over the in-memory store:
//! - request deserialization and validation
//! - status codes per placement
//! - error bodies
//!
//! Only the domain router is exercised, not the full application.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_events::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use test_utils::TestDataBuilder;
use tower::ServiceExt; // For oneshot()

fn app() -> Router {
    handlers::router(EventService::new(InMemoryEventRepository::new()))
}

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn create(app: &Router, max_slots: i32) -> CreatedEvent {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/",
            json!({"name": "Raid", "time": "Friday 20:00", "maxSlots": max_slots}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

async fn register(app: &Router, event_id: i32, nickname: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/{}/participants", event_id),
            json!({"nickname": nickname, "vocation": "knight"}),
        ))
        .await
        .unwrap();
    let status = response.status();
    (status, json_body(response.into_body()).await)
}

#[tokio::test]
async fn test_create_event_returns_id_and_secret() {
    let app = app();
    let created = create(&app, 2).await;

    assert_eq!(created.id, 1);
    assert_eq!(created.password.len(), 8);
    assert!(created.password.chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn test_listing_never_exposes_secret() {
    let app = app();
    create(&app, 2).await;

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let events: Value = json_body(response.into_body()).await;
    let events = events.as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["maxSlots"], 2);
    assert_eq!(events[0]["observations"], "[]");
    assert!(events[0].get("password").is_none());
}

#[tokio::test]
async fn test_create_event_missing_field_is_bad_request() {
    let response = app()
        .oneshot(json_request("POST", "/", json!({"name": "Raid", "time": "20:00"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "INVALID_JSON");
}

#[tokio::test]
async fn test_create_event_zero_slots_is_validation_error() {
    let response = app()
        .oneshot(json_request(
            "POST",
            "/",
            json!({"name": "Raid", "time": "20:00", "maxSlots": 0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["details"].get("max_slots").is_some());
}

#[tokio::test]
async fn test_register_confirms_then_waitlists() {
    let app = app();
    let builder = TestDataBuilder::from_test_name("handler_register_overflow");
    let created = create(&app, 2).await;

    let (status, body) = register(&app, created.id, &builder.nickname(1)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"id": 1}));

    let (status, body) = register(&app, created.id, &builder.nickname(2)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"id": 2}));

    let (status, body) = register(&app, created.id, &builder.nickname(3)).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body, json!({"message": "Added to reservation list"}));

    let response = app
        .clone()
        .oneshot(get(&format!("/{}/participants", created.id)))
        .await
        .unwrap();
    let participants: Vec<Registrant> = json_body(response.into_body()).await;
    assert_eq!(participants.len(), 2);
    assert_eq!(participants[0].nickname, builder.nickname(1));

    let response = app
        .oneshot(get(&format!("/{}/reservations", created.id)))
        .await
        .unwrap();
    let reservations: Vec<Registrant> = json_body(response.into_body()).await;
    assert_eq!(reservations.len(), 1);
    assert_eq!(reservations[0].event_id, created.id);
}

#[tokio::test]
async fn test_register_unknown_event_is_not_found() {
    let (status, body) = register(&app(), 77, "A").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Event not found");
}

#[tokio::test]
async fn test_register_empty_nickname_is_bad_request() {
    let app = app();
    let created = create(&app, 2).await;

    let (status, _) = register(&app, created.id, "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(get(&format!("/{}/participants", created.id)))
        .await
        .unwrap();
    let participants: Vec<Registrant> = json_body(response.into_body()).await;
    assert!(participants.is_empty());
}

#[tokio::test]
async fn test_invalid_id_segment_is_bad_request() {
    for uri in ["/abc", "/0", "/-4/participants", "/1.5/reservations"] {
        let response = app().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri {}", uri);
    }
}

#[tokio::test]
async fn test_unknown_event_rosters_are_empty() {
    let response = app().oneshot(get("/12/participants")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let participants: Vec<Registrant> = json_body(response.into_body()).await;
    assert!(participants.is_empty());
}

#[tokio::test]
async fn test_get_unknown_event_is_not_found() {
    let response = app().oneshot(get("/5")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_with_wrong_secret_is_forbidden() {
    let app = app();
    let created = create(&app, 1).await;
    register(&app, created.id, "A").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            &format!("/{}", created.id),
            json!({"password": "not-the-secret"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Invalid password");

    let response = app
        .oneshot(get(&format!("/{}", created.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_delete_with_empty_password_is_forbidden() {
    let app = app();
    let created = create(&app, 1).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            &format!("/{}", created.id),
            json!({"password": ""}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(get(&format!("/{}", created.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_event_with_empty_name_and_time_is_created() {
    let response = app()
        .oneshot(json_request(
            "POST",
            "/",
            json!({"name": "", "time": "", "maxSlots": 2}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created: CreatedEvent = json_body(response.into_body()).await;
    assert_eq!(created.password.len(), 8);
}

#[tokio::test]
async fn test_delete_without_password_is_bad_request() {
    let app = app();
    let created = create(&app, 1).await;

    let response = app
        .oneshot(json_request("DELETE", &format!("/{}", created.id), json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_cascades_and_event_disappears() {
    let app = app();
    let created = create(&app, 1).await;
    register(&app, created.id, "A").await;
    register(&app, created.id, "B").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            &format!("/{}", created.id),
            json!({"password": created.password}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: DeletedEvent = json_body(response.into_body()).await;
    assert_eq!(body.message, "Event, participants, and reservations deleted");

    for suffix in ["participants", "reservations"] {
        let response = app
            .clone()
            .oneshot(get(&format!("/{}/{}", created.id, suffix)))
            .await
            .unwrap();
        let roster: Vec<Registrant> = json_body(response.into_body()).await;
        assert!(roster.is_empty(), "{} should be empty", suffix);
    }

    let response = app
        .clone()
        .oneshot(get(&format!("/{}", created.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(json_request(
            "DELETE",
            &format!("/{}", created.id),
            json!({"password": created.password}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
