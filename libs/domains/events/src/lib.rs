//! Events Domain
//!
//! Sign-ups for events with a fixed number of slots. Registrants beyond
//! capacity land on a waitlist (reservations) and are never promoted. An event
//! is deleted, together with both rosters, by presenting the secret handed out
//! when it was created.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, audit log
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, registration engine, deletion coordinator
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← EventStore + RosterStore (in-memory, PostgreSQL)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← DTOs, placement policy
//! └─────────────┘
//! ```
//!
//! Admission (count, compare, insert) runs inside the store under a per-event
//! exclusion: a row lock on `events` for PostgreSQL, a mutex per event in memory.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_events::{handlers, InMemoryEventRepository, EventService};
//!
//! let service = EventService::new(InMemoryEventRepository::new());
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod secret;
pub mod service;

pub use error::{EventError, EventResult};
pub use handlers::ApiDoc;
pub use models::{
    CreateEvent, CreatedEvent, DeleteEvent, DeletedEvent, Event, NewEvent, NewRegistrant,
    Placement, RegisterParticipant, Registrant, RegistrationResponse, RosterKind,
};
pub use postgres::PgEventRepository;
pub use repository::{EventRepository, EventStore, InMemoryEventRepository, RosterStore};
pub use service::EventService;
