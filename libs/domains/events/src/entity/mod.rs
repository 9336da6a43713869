//! SeaORM entities for the `events`, `participants` and `reservations` tables.

pub mod event;
pub mod participant;
pub mod reservation;
