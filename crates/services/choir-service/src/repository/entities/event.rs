//! Event database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{Event, EventType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub choir_id: Option<i32>,
    pub title: String,
    pub event_type: EventType,
    pub location: Option<String>,
    pub starts_at: DateTimeUtc,
    pub ends_at: Option<DateTimeUtc>,
    pub description: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendance,
}

impl Related<super::attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Event {
    fn from(model: Model) -> Self {
        Event {
            id: model.id,
            choir_id: model.choir_id,
            title: model.title,
            event_type: model.event_type,
            location: model.location,
            starts_at: model.starts_at,
            ends_at: model.ends_at,
            description: model.description,
            created_at: model.created_at,
        }
    }
}
