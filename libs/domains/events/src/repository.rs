use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};
use tokio::sync::{Mutex, RwLock};

use crate::error::{EventError, EventResult};
use crate::models::{Event, NewEvent, NewRegistrant, Placement, Registrant, RosterKind};

/// Event rows: capacity, metadata and the deletion secret
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Persist a new event; the store assigns the id
    async fn create_event(&self, input: NewEvent) -> EventResult<Event>;

    async fn get_event(&self, id: i32) -> EventResult<Option<Event>>;

    async fn max_slots(&self, id: i32) -> EventResult<Option<i32>>;

    async fn secret(&self, id: i32) -> EventResult<Option<String>>;

    /// Remove the event and both of its rosters as one unit.
    /// `false` when the event did not exist.
    async fn delete_event(&self, id: i32) -> EventResult<bool>;

    /// All events, oldest first
    async fn list_events(&self) -> EventResult<Vec<Event>>;
}

/// Participant and reservation rows
#[async_trait]
pub trait RosterStore: Send + Sync {
    async fn count_participants(&self, event_id: i32) -> EventResult<u64>;

    /// Fails with `NotFound` when the event does not exist
    async fn insert_participant(
        &self,
        event_id: i32,
        registrant: NewRegistrant,
    ) -> EventResult<i32>;

    /// Fails with `NotFound` when the event does not exist
    async fn insert_reservation(
        &self,
        event_id: i32,
        registrant: NewRegistrant,
    ) -> EventResult<i32>;

    /// Participants in arrival order; empty for unknown events
    async fn list_participants(&self, event_id: i32) -> EventResult<Vec<Registrant>>;

    /// Reservations in arrival order; empty for unknown events
    async fn list_reservations(&self, event_id: i32) -> EventResult<Vec<Registrant>>;

    /// Clear both rosters, returning how many rows went away
    async fn delete_by_event(&self, event_id: i32) -> EventResult<u64>;

    /// Read capacity, count participants, and insert into the roster picked by
    /// [`RosterKind::for_count`], all while holding the event's exclusion.
    async fn admit(&self, event_id: i32, registrant: NewRegistrant) -> EventResult<Placement>;
}

/// Everything the service needs from a store
pub trait EventRepository: EventStore + RosterStore {}

impl<T: EventStore + RosterStore> EventRepository for T {}

/// One event and its rosters, guarded by a per-event mutex
#[derive(Debug)]
struct EventSlot {
    event: Event,
    secret: String,
    participants: Vec<Registrant>,
    reservations: Vec<Registrant>,
    /// Set under the mutex before the slot leaves the map
    deleted: bool,
}

impl EventSlot {
    fn roster_mut(&mut self, kind: RosterKind) -> &mut Vec<Registrant> {
        match kind {
            RosterKind::Participant => &mut self.participants,
            RosterKind::Reservation => &mut self.reservations,
        }
    }
}

/// In-memory implementation of the event stores (for development/testing)
///
/// The map lock is held only to look up or insert a slot handle; all roster
/// work happens under that slot's own mutex, so events never contend.
#[derive(Debug, Clone)]
pub struct InMemoryEventRepository {
    events: Arc<RwLock<HashMap<i32, Arc<Mutex<EventSlot>>>>>,
    next_event_id: Arc<AtomicI32>,
    next_participant_id: Arc<AtomicI32>,
    next_reservation_id: Arc<AtomicI32>,
}

impl Default for InMemoryEventRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self {
            events: Arc::new(RwLock::new(HashMap::new())),
            next_event_id: Arc::new(AtomicI32::new(1)),
            next_participant_id: Arc::new(AtomicI32::new(1)),
            next_reservation_id: Arc::new(AtomicI32::new(1)),
        }
    }

    async fn slot(&self, id: i32) -> Option<Arc<Mutex<EventSlot>>> {
        self.events.read().await.get(&id).cloned()
    }

    fn next_id(&self, kind: RosterKind) -> i32 {
        let counter = match kind {
            RosterKind::Participant => &self.next_participant_id,
            RosterKind::Reservation => &self.next_reservation_id,
        };
        counter.fetch_add(1, Ordering::SeqCst)
    }

    /// Append to a roster of a slot the caller has already locked
    fn push(
        &self,
        slot: &mut EventSlot,
        kind: RosterKind,
        registrant: NewRegistrant,
    ) -> i32 {
        let id = self.next_id(kind);
        let event_id = slot.event.id;
        slot.roster_mut(kind).push(Registrant {
            id,
            event_id,
            nickname: registrant.nickname,
            vocation: registrant.vocation,
            created_at: Utc::now(),
        });
        id
    }

    async fn insert(
        &self,
        event_id: i32,
        kind: RosterKind,
        registrant: NewRegistrant,
    ) -> EventResult<i32> {
        let slot = self
            .slot(event_id)
            .await
            .ok_or(EventError::NotFound(event_id))?;
        let mut slot = slot.lock().await;
        if slot.deleted {
            return Err(EventError::NotFound(event_id));
        }

        Ok(self.push(&mut slot, kind, registrant))
    }

    async fn roster(&self, event_id: i32, kind: RosterKind) -> Vec<Registrant> {
        let Some(slot) = self.slot(event_id).await else {
            return Vec::new();
        };
        let slot = slot.lock().await;
        if slot.deleted {
            return Vec::new();
        }

        match kind {
            RosterKind::Participant => slot.participants.clone(),
            RosterKind::Reservation => slot.reservations.clone(),
        }
    }
}

#[async_trait]
impl EventStore for InMemoryEventRepository {
    async fn create_event(&self, input: NewEvent) -> EventResult<Event> {
        let id = self.next_event_id.fetch_add(1, Ordering::SeqCst);
        let event = Event {
            id,
            name: input.name,
            time: input.time,
            max_slots: input.max_slots,
            observations: input.observations,
            created_at: Utc::now(),
        };

        let slot = EventSlot {
            event: event.clone(),
            secret: input.secret,
            participants: Vec::new(),
            reservations: Vec::new(),
            deleted: false,
        };
        self.events
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(slot)));

        tracing::info!(event_id = id, max_slots = event.max_slots, "Created event");
        Ok(event)
    }

    async fn get_event(&self, id: i32) -> EventResult<Option<Event>> {
        let Some(slot) = self.slot(id).await else {
            return Ok(None);
        };
        let slot = slot.lock().await;
        Ok((!slot.deleted).then(|| slot.event.clone()))
    }

    async fn max_slots(&self, id: i32) -> EventResult<Option<i32>> {
        Ok(self.get_event(id).await?.map(|event| event.max_slots))
    }

    async fn secret(&self, id: i32) -> EventResult<Option<String>> {
        let Some(slot) = self.slot(id).await else {
            return Ok(None);
        };
        let slot = slot.lock().await;
        Ok((!slot.deleted).then(|| slot.secret.clone()))
    }

    async fn delete_event(&self, id: i32) -> EventResult<bool> {
        let Some(slot) = self.slot(id).await else {
            return Ok(false);
        };

        {
            let mut slot = slot.lock().await;
            if slot.deleted {
                return Ok(false);
            }
            slot.deleted = true;
            slot.participants.clear();
            slot.reservations.clear();
        }

        self.events.write().await.remove(&id);

        tracing::info!(event_id = id, "Deleted event with its rosters");
        Ok(true)
    }

    async fn list_events(&self) -> EventResult<Vec<Event>> {
        let slots: Vec<_> = self.events.read().await.values().cloned().collect();

        let mut events = Vec::with_capacity(slots.len());
        for slot in slots {
            let slot = slot.lock().await;
            if !slot.deleted {
                events.push(slot.event.clone());
            }
        }

        events.sort_by_key(|event| event.id);
        Ok(events)
    }
}

#[async_trait]
impl RosterStore for InMemoryEventRepository {
    async fn count_participants(&self, event_id: i32) -> EventResult<u64> {
        Ok(self.roster(event_id, RosterKind::Participant).await.len() as u64)
    }

    async fn insert_participant(
        &self,
        event_id: i32,
        registrant: NewRegistrant,
    ) -> EventResult<i32> {
        self.insert(event_id, RosterKind::Participant, registrant)
            .await
    }

    async fn insert_reservation(
        &self,
        event_id: i32,
        registrant: NewRegistrant,
    ) -> EventResult<i32> {
        self.insert(event_id, RosterKind::Reservation, registrant)
            .await
    }

    async fn list_participants(&self, event_id: i32) -> EventResult<Vec<Registrant>> {
        Ok(self.roster(event_id, RosterKind::Participant).await)
    }

    async fn list_reservations(&self, event_id: i32) -> EventResult<Vec<Registrant>> {
        Ok(self.roster(event_id, RosterKind::Reservation).await)
    }

    async fn delete_by_event(&self, event_id: i32) -> EventResult<u64> {
        let Some(slot) = self.slot(event_id).await else {
            return Ok(0);
        };
        let mut slot = slot.lock().await;

        let removed = slot.participants.len() + slot.reservations.len();
        slot.participants.clear();
        slot.reservations.clear();
        Ok(removed as u64)
    }

    async fn admit(&self, event_id: i32, registrant: NewRegistrant) -> EventResult<Placement> {
        let slot = self
            .slot(event_id)
            .await
            .ok_or(EventError::NotFound(event_id))?;
        let mut slot = slot.lock().await;
        if slot.deleted {
            return Err(EventError::NotFound(event_id));
        }

        let kind = RosterKind::for_count(slot.participants.len() as u64, slot.event.max_slots);
        let id = self.push(&mut slot, kind, registrant);

        let placement = match kind {
            RosterKind::Participant => Placement::Confirmed(id),
            RosterKind::Reservation => Placement::Waitlisted,
        };

        tracing::info!(event_id, roster = %kind, registrant_id = id, "Admitted registrant");
        Ok(placement)
    }
}
