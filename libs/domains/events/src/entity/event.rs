//! Events with their slot count and deletion secret.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub time: String,
    pub max_slots: i32,
    #[sea_orm(column_type = "Text")]
    pub observations: String,
    pub password: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::participant::Entity")]
    Participants,
    #[sea_orm(has_many = "super::reservation::Entity")]
    Reservations,
}

impl Related<super::participant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participants.def()
    }
}

impl Related<super::reservation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Event {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            time: model.time,
            max_slots: model.max_slots,
            observations: model.observations,
            created_at: model.created_at.into(),
        }
    }
}
