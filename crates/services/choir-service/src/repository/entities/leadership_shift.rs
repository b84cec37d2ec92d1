//! Leadership shift database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{LeadershipShift, ShiftStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "leadership_shifts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub leader_id: i32,
    pub start_date: Date,
    pub end_date: Date,
    pub status: ShiftStatus,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for LeadershipShift {
    fn from(model: Model) -> Self {
        LeadershipShift {
            id: model.id,
            name: model.name,
            leader_id: model.leader_id,
            start_date: model.start_date,
            end_date: model.end_date,
            status: model.status,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
