use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::ToSchema;
use validator::Validate;

/// Message returned when a registrant lands on the waitlist
pub const WAITLISTED_MESSAGE: &str = "Added to reservation list";

/// Message returned after a successful delete
pub const DELETED_MESSAGE: &str = "Event, participants, and reservations deleted";

fn default_observations() -> String {
    "[]".to_string()
}

/// Public view of an event. The deletion secret is never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i32,
    pub name: String,
    /// Free-form schedule, stored as given
    pub time: String,
    pub max_slots: i32,
    pub observations: String,
    pub created_at: DateTime<Utc>,
}

/// Participant or reservation row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Registrant {
    pub id: i32,
    pub event_id: i32,
    pub nickname: String,
    pub vocation: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEvent {
    pub name: String,
    pub time: String,
    #[validate(range(min = 1))]
    pub max_slots: i32,
    #[serde(default = "default_observations")]
    pub observations: String,
}

/// What the store persists for a new event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub name: String,
    pub time: String,
    pub max_slots: i32,
    pub observations: String,
    pub secret: String,
}

impl NewEvent {
    pub fn new(input: CreateEvent, secret: String) -> Self {
        Self {
            name: input.name,
            time: input.time,
            max_slots: input.max_slots,
            observations: input.observations,
            secret,
        }
    }
}

/// Returned once, to the creator only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreatedEvent {
    pub id: i32,
    /// Deletion secret, 8 lowercase hex characters
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterParticipant {
    #[validate(length(min = 1))]
    pub nickname: String,
    #[validate(length(min = 1))]
    pub vocation: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistrant {
    pub nickname: String,
    pub vocation: String,
}

impl From<RegisterParticipant> for NewRegistrant {
    fn from(input: RegisterParticipant) -> Self {
        Self {
            nickname: input.nickname,
            vocation: input.vocation,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct DeleteEvent {
    /// Compared as-is, so an empty string is a mismatch rather than bad input
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeletedEvent {
    pub message: String,
}

impl Default for DeletedEvent {
    fn default() -> Self {
        Self {
            message: DELETED_MESSAGE.to_string(),
        }
    }
}

/// Which roster a registrant is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum RosterKind {
    Participant,
    Reservation,
}

impl RosterKind {
    /// Admission policy: a participant while `participants < max_slots`, a
    /// reservation otherwise. Reservations never count.
    pub fn for_count(participants: u64, max_slots: i32) -> Self {
        let capacity = u64::try_from(max_slots).unwrap_or(0);
        if participants < capacity {
            RosterKind::Participant
        } else {
            RosterKind::Reservation
        }
    }
}

/// Outcome of a registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Holds the new participant id
    Confirmed(i32),
    Waitlisted,
}

impl Placement {
    pub fn kind(&self) -> RosterKind {
        match self {
            Placement::Confirmed(_) => RosterKind::Participant,
            Placement::Waitlisted => RosterKind::Reservation,
        }
    }
}

/// Wire shape of a registration: `{id}` when confirmed, `{message}` when waitlisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum RegistrationResponse {
    Confirmed { id: i32 },
    Waitlisted { message: String },
}

impl From<Placement> for RegistrationResponse {
    fn from(placement: Placement) -> Self {
        match placement {
            Placement::Confirmed(id) => RegistrationResponse::Confirmed { id },
            Placement::Waitlisted => RegistrationResponse::Waitlisted {
                message: WAITLISTED_MESSAGE.to_string(),
            },
        }
    }
}
