//! Song practised in a rehearsal.

use sea_orm::entity::prelude::*;

use domain::RehearsalSong;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "rehearsal_songs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub rehearsal_id: i32,
    pub song_id: i32,
    pub song_order: i32,
    pub musical_key: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::rehearsal::Entity",
        from = "Column::RehearsalId",
        to = "super::rehearsal::Column::Id",
        on_delete = "Cascade"
    )]
    Rehearsal,
}

impl Related<super::rehearsal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rehearsal.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for RehearsalSong {
    fn from(model: Model) -> Self {
        RehearsalSong {
            id: model.id,
            song_id: model.song_id,
            order: model.song_order,
            musical_key: model.musical_key,
        }
    }
}
