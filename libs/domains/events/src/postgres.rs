use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionTrait,
};

use crate::{
    entity::{event, participant, reservation},
    error::{EventError, EventResult},
    models::{Event, NewEvent, NewRegistrant, Placement, Registrant, RosterKind},
    repository::{EventStore, RosterStore},
};

/// PostgreSQL implementation of the event stores.
///
/// `admit` and `delete_event` run in one transaction each and start with
/// `SELECT ... FOR UPDATE` on the event row, so work on the same event queues
/// on that lock while other events proceed.
#[derive(Clone)]
pub struct PgEventRepository {
    db: DatabaseConnection,
}

impl PgEventRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// A foreign key violation on insert means the event is gone
fn insert_error(event_id: i32) -> impl Fn(DbErr) -> EventError {
    move |err| match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => EventError::NotFound(event_id),
        _ => err.into(),
    }
}

async fn insert_registrant<C: ConnectionTrait>(
    conn: &C,
    event_id: i32,
    kind: RosterKind,
    registrant: NewRegistrant,
) -> Result<i32, DbErr> {
    let now = Utc::now();

    let id = match kind {
        RosterKind::Participant => {
            participant::ActiveModel {
                event_id: Set(event_id),
                nickname: Set(registrant.nickname),
                vocation: Set(registrant.vocation),
                created_at: Set(now.into()),
                ..Default::default()
            }
            .insert(conn)
            .await?
            .id
        }
        RosterKind::Reservation => {
            reservation::ActiveModel {
                event_id: Set(event_id),
                nickname: Set(registrant.nickname),
                vocation: Set(registrant.vocation),
                created_at: Set(now.into()),
                ..Default::default()
            }
            .insert(conn)
            .await?
            .id
        }
    };

    Ok(id)
}

async fn count_participants_in<C: ConnectionTrait>(conn: &C, event_id: i32) -> Result<u64, DbErr> {
    participant::Entity::find()
        .filter(participant::Column::EventId.eq(event_id))
        .count(conn)
        .await
}

async fn delete_rosters_in<C: ConnectionTrait>(conn: &C, event_id: i32) -> Result<u64, DbErr> {
    let participants = participant::Entity::delete_many()
        .filter(participant::Column::EventId.eq(event_id))
        .exec(conn)
        .await?;

    let reservations = reservation::Entity::delete_many()
        .filter(reservation::Column::EventId.eq(event_id))
        .exec(conn)
        .await?;

    Ok(participants.rows_affected + reservations.rows_affected)
}

#[async_trait]
impl EventStore for PgEventRepository {
    async fn create_event(&self, input: NewEvent) -> EventResult<Event> {
        let model = event::ActiveModel {
            name: Set(input.name),
            time: Set(input.time),
            max_slots: Set(input.max_slots),
            observations: Set(input.observations),
            password: Set(input.secret),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        tracing::info!(event_id = model.id, max_slots = model.max_slots, "Created event");
        Ok(model.into())
    }

    async fn get_event(&self, id: i32) -> EventResult<Option<Event>> {
        let model = event::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn max_slots(&self, id: i32) -> EventResult<Option<i32>> {
        let model = event::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(|m| m.max_slots))
    }

    async fn secret(&self, id: i32) -> EventResult<Option<String>> {
        let model = event::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(|m| m.password))
    }

    async fn delete_event(&self, id: i32) -> EventResult<bool> {
        let txn = self.db.begin().await?;

        let locked = event::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?;
        if locked.is_none() {
            txn.rollback().await?;
            return Ok(false);
        }

        let rosters = delete_rosters_in(&txn, id).await?;
        event::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(event_id = id, roster_rows = rosters, "Deleted event with its rosters");
        Ok(true)
    }

    async fn list_events(&self) -> EventResult<Vec<Event>> {
        let models = event::Entity::find()
            .order_by_asc(event::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl RosterStore for PgEventRepository {
    async fn count_participants(&self, event_id: i32) -> EventResult<u64> {
        Ok(count_participants_in(&self.db, event_id).await?)
    }

    async fn insert_participant(
        &self,
        event_id: i32,
        registrant: NewRegistrant,
    ) -> EventResult<i32> {
        insert_registrant(&self.db, event_id, RosterKind::Participant, registrant)
            .await
            .map_err(insert_error(event_id))
    }

    async fn insert_reservation(
        &self,
        event_id: i32,
        registrant: NewRegistrant,
    ) -> EventResult<i32> {
        insert_registrant(&self.db, event_id, RosterKind::Reservation, registrant)
            .await
            .map_err(insert_error(event_id))
    }

    async fn list_participants(&self, event_id: i32) -> EventResult<Vec<Registrant>> {
        let models = participant::Entity::find()
            .filter(participant::Column::EventId.eq(event_id))
            .order_by_asc(participant::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn list_reservations(&self, event_id: i32) -> EventResult<Vec<Registrant>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::EventId.eq(event_id))
            .order_by_asc(reservation::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn delete_by_event(&self, event_id: i32) -> EventResult<u64> {
        let txn = self.db.begin().await?;
        let removed = delete_rosters_in(&txn, event_id).await?;
        txn.commit().await?;
        Ok(removed)
    }

    async fn admit(&self, event_id: i32, registrant: NewRegistrant) -> EventResult<Placement> {
        let txn = self.db.begin().await?;

        let Some(event) = event::Entity::find_by_id(event_id)
            .lock_exclusive()
            .one(&txn)
            .await?
        else {
            txn.rollback().await?;
            return Err(EventError::NotFound(event_id));
        };

        let count = count_participants_in(&txn, event_id).await?;
        let kind = RosterKind::for_count(count, event.max_slots);
        let id = insert_registrant(&txn, event_id, kind, registrant).await?;
        txn.commit().await?;

        let placement = match kind {
            RosterKind::Participant => Placement::Confirmed(id),
            RosterKind::Reservation => Placement::Waitlisted,
        };

        tracing::info!(event_id, roster = %kind, registrant_id = id, "Admitted registrant");
        Ok(placement)
    }
}
