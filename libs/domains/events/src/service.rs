use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{EventError, EventResult};
use crate::models::{
    CreateEvent, CreatedEvent, Event, NewEvent, Placement, RegisterParticipant, Registrant,
};
use crate::repository::EventRepository;
use crate::secret::generate_secret;

/// Registration engine and deletion coordinator over an [`EventRepository`]
pub struct EventService<R: EventRepository> {
    repository: Arc<R>,
}

impl<R: EventRepository> Clone for EventService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: EventRepository> EventService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create an event and hand back its deletion secret.
    ///
    /// The secret is only ever returned here.
    #[instrument(skip(self, input), fields(name = %input.name, max_slots = input.max_slots))]
    pub async fn create_event(&self, input: CreateEvent) -> EventResult<CreatedEvent> {
        input
            .validate()
            .map_err(|e| EventError::InvalidInput(e.to_string()))?;

        let password = generate_secret();
        let event = self
            .repository
            .create_event(NewEvent::new(input, password.clone()))
            .await?;

        Ok(CreatedEvent {
            id: event.id,
            password,
        })
    }

    /// Place a registrant on the event's participant list, or on its waitlist
    /// once `max_slots` participants exist.
    ///
    /// Input is checked before the store is touched. Capacity check and insert
    /// happen atomically inside the store.
    #[instrument(skip(self, input))]
    pub async fn register(
        &self,
        event_id: i32,
        input: RegisterParticipant,
    ) -> EventResult<Placement> {
        input
            .validate()
            .map_err(|e| EventError::InvalidInput(e.to_string()))?;

        self.repository.admit(event_id, input.into()).await
    }

    /// Delete an event with both rosters, given its secret.
    #[instrument(skip(self, secret))]
    pub async fn delete_event(&self, event_id: i32, secret: &str) -> EventResult<()> {
        let stored = self
            .repository
            .secret(event_id)
            .await?
            .ok_or(EventError::NotFound(event_id))?;

        if stored != secret {
            tracing::warn!(event_id, "Rejected delete with wrong secret");
            return Err(EventError::Forbidden(event_id));
        }

        // A concurrent delete may have won the race
        if !self.repository.delete_event(event_id).await? {
            return Err(EventError::NotFound(event_id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_event(&self, event_id: i32) -> EventResult<Event> {
        self.repository
            .get_event(event_id)
            .await?
            .ok_or(EventError::NotFound(event_id))
    }

    pub async fn list_events(&self) -> EventResult<Vec<Event>> {
        self.repository.list_events().await
    }

    /// Empty for unknown events
    #[instrument(skip(self))]
    pub async fn list_participants(&self, event_id: i32) -> EventResult<Vec<Registrant>> {
        self.repository.list_participants(event_id).await
    }

    /// Empty for unknown events
    #[instrument(skip(self))]
    pub async fn list_reservations(&self, event_id: i32) -> EventResult<Vec<Registrant>> {
        self.repository.list_reservations(event_id).await
    }
}
