//! Integration tests for the Events domain
//!
//! Run the PostgreSQL store against a real database via testcontainers:
//! - row locking keeps admissions within capacity under concurrency
//! - cascading delete leaves no roster rows behind
//! - foreign keys reject registrants of missing events
//!
//! Ignored by default because they need Docker:
//! `cargo test -p domain_events -- --ignored`

use domain_events::*;
use test_utils::{TestDataBuilder, TestDatabase, assertions::*};

fn new_event(builder: &TestDataBuilder, max_slots: i32) -> NewEvent {
    NewEvent {
        name: builder.name("event", "main"),
        time: "Saturday 21:00".to_string(),
        max_slots,
        observations: "[]".to_string(),
        secret: "0a1b2c3d".to_string(),
    }
}

fn registrant(builder: &TestDataBuilder, n: usize) -> NewRegistrant {
    NewRegistrant {
        nickname: builder.nickname(n),
        vocation: builder.vocation(n),
    }
}

// ============================================================================
// Event Store Tests
// ============================================================================

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_and_get_event() {
    let db = TestDatabase::new().await;
    let repo = PgEventRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("create_and_get");

    let created = repo.create_event(new_event(&builder, 4)).await.unwrap();
    assert!(created.id > 0);

    let fetched = assert_some(repo.get_event(created.id).await.unwrap(), "event should exist");
    assert_eq!(fetched.name, builder.name("event", "main"));
    assert_eq!(fetched.max_slots, 4);

    assert_eq!(repo.max_slots(created.id).await.unwrap(), Some(4));
    assert_eq!(
        repo.secret(created.id).await.unwrap().as_deref(),
        Some("0a1b2c3d")
    );
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_ids_are_monotonic() {
    let db = TestDatabase::new().await;
    let repo = PgEventRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("monotonic_ids");

    let first = repo.create_event(new_event(&builder, 1)).await.unwrap();
    let second = repo.create_event(new_event(&builder, 1)).await.unwrap();
    assert!(second.id > first.id);

    let ids: Vec<_> = repo
        .list_events()
        .await
        .unwrap()
        .into_iter()
        .map(|event| event.id)
        .collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

// ============================================================================
// Roster Store Tests
// ============================================================================

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_admit_fills_then_waitlists() {
    let db = TestDatabase::new().await;
    let repo = PgEventRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("admit_sequential");

    let event = repo.create_event(new_event(&builder, 2)).await.unwrap();

    let mut placements = Vec::new();
    for n in 0..5 {
        placements.push(repo.admit(event.id, registrant(&builder, n)).await.unwrap());
    }

    assert!(matches!(placements[0], Placement::Confirmed(_)));
    assert!(matches!(placements[1], Placement::Confirmed(_)));
    assert!(
        placements[2..]
            .iter()
            .all(|p| *p == Placement::Waitlisted)
    );

    assert_eq!(repo.count_participants(event.id).await.unwrap(), 2);
    assert_len(&repo.list_reservations(event.id).await.unwrap(), 3, "reservations");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_admit_unknown_event_writes_nothing() {
    let db = TestDatabase::new().await;
    let repo = PgEventRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("admit_unknown");

    let result = repo.admit(9999, registrant(&builder, 0)).await;
    assert!(matches!(result, Err(EventError::NotFound(9999))));
    assert!(repo.list_participants(9999).await.unwrap().is_empty());
    assert!(repo.list_reservations(9999).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_insert_for_missing_event_is_not_found() {
    let db = TestDatabase::new().await;
    let repo = PgEventRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("insert_missing");

    let result = repo.insert_participant(4242, registrant(&builder, 0)).await;
    assert!(matches!(result, Err(EventError::NotFound(4242))));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_delete_by_event_clears_both_rosters() {
    let db = TestDatabase::new().await;
    let repo = PgEventRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("delete_by_event");

    let event = repo.create_event(new_event(&builder, 1)).await.unwrap();
    repo.insert_participant(event.id, registrant(&builder, 0))
        .await
        .unwrap();
    repo.insert_reservation(event.id, registrant(&builder, 1))
        .await
        .unwrap();

    assert_eq!(repo.delete_by_event(event.id).await.unwrap(), 2);
    assert!(repo.get_event(event.id).await.unwrap().is_some());
}

// ============================================================================
// Deletion Tests
// ============================================================================

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_delete_event_cascades() {
    let db = TestDatabase::new().await;
    let service = EventService::new(PgEventRepository::new(db.connection()));
    let builder = TestDataBuilder::from_test_name("delete_cascade");

    let created = service
        .create_event(CreateEvent {
            name: builder.name("event", "cascade"),
            time: "Sunday".to_string(),
            max_slots: 1,
            observations: "[]".to_string(),
        })
        .await
        .unwrap();

    for n in 0..3 {
        service
            .register(
                created.id,
                RegisterParticipant {
                    nickname: builder.nickname(n),
                    vocation: builder.vocation(n),
                },
            )
            .await
            .unwrap();
    }

    let wrong = service.delete_event(created.id, "ffffffff").await;
    assert!(matches!(wrong, Err(EventError::Forbidden(_))));
    assert_len(&service.list_reservations(created.id).await.unwrap(), 2, "reservations kept");

    service
        .delete_event(created.id, &created.password)
        .await
        .unwrap();

    assert!(service.list_participants(created.id).await.unwrap().is_empty());
    assert!(service.list_reservations(created.id).await.unwrap().is_empty());
    assert!(matches!(
        service.get_event(created.id).await,
        Err(EventError::NotFound(_))
    ));
}

// ============================================================================
// Concurrency Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires Docker"]
async fn test_concurrent_admissions_respect_capacity() {
    let db = TestDatabase::new().await;
    let repo = PgEventRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("concurrent_admit");

    let event = repo.create_event(new_event(&builder, 5)).await.unwrap();

    let mut handles = vec![];
    for n in 0..20 {
        let repo = repo.clone();
        let registrant = registrant(&builder, n);
        let handle = tokio::spawn(async move { repo.admit(event.id, registrant).await });
        handles.push(handle);
    }

    let results: Vec<_> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|r| r.unwrap().unwrap())
        .collect();

    let confirmed = results
        .iter()
        .filter(|p| matches!(p, Placement::Confirmed(_)))
        .count();
    assert_eq!(confirmed, 5);
    assert_eq!(repo.count_participants(event.id).await.unwrap(), 5);
    assert_len(&repo.list_reservations(event.id).await.unwrap(), 15, "reservations");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires Docker"]
async fn test_events_do_not_block_each_other() {
    let db = TestDatabase::new().await;
    let repo = PgEventRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("independent_events");

    let first = repo.create_event(new_event(&builder, 3)).await.unwrap();
    let second = repo.create_event(new_event(&builder, 3)).await.unwrap();

    let mut handles = vec![];
    for n in 0..10 {
        let repo = repo.clone();
        let event_id = if n % 2 == 0 { first.id } else { second.id };
        let registrant = registrant(&builder, n);
        handles.push(tokio::spawn(async move { repo.admit(event_id, registrant).await }));
    }

    for result in futures::future::join_all(handles).await {
        result.unwrap().unwrap();
    }

    assert_eq!(repo.count_participants(first.id).await.unwrap(), 3);
    assert_eq!(repo.count_participants(second.id).await.unwrap(), 3);
}
