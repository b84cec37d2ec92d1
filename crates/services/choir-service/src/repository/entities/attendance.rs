//! Attendance database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{AttendanceRecord, AttendanceStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "attendance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub event_id: i32,
    pub user_id: i32,
    pub status: AttendanceStatus,
    pub note: Option<String>,
    pub recorded_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::event::Entity",
        from = "Column::EventId",
        to = "super::event::Column::Id",
        on_delete = "Cascade"
    )]
    Event,
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for AttendanceRecord {
    fn from(model: Model) -> Self {
        AttendanceRecord {
            id: model.id,
            event_id: model.event_id,
            user_id: model.user_id,
            status: model.status,
            note: model.note,
            recorded_at: model.recorded_at,
        }
    }
}
