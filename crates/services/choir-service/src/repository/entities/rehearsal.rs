//! Rehearsal database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::Rehearsal;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "rehearsals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub venue: Option<String>,
    pub starts_at: DateTimeUtc,
    pub ends_at: Option<DateTimeUtc>,
    pub performance_id: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::rehearsal_song::Entity")]
    Songs,
}

impl Related<super::rehearsal_song::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Songs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Rehearsal {
    fn from(model: Model) -> Self {
        Rehearsal {
            id: model.id,
            title: model.title,
            venue: model.venue,
            starts_at: model.starts_at,
            ends_at: model.ends_at,
            performance_id: model.performance_id,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
