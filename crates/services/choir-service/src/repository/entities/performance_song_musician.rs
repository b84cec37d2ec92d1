//! Musician assigned to a performance song.

use sea_orm::entity::prelude::*;

use domain::PerformanceMusician;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "performance_song_musicians")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub performance_song_id: i32,
    pub user_id: i32,
    pub instrument: Option<String>,
    pub is_solo: bool,
    pub is_accompanist: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::performance_song::Entity",
        from = "Column::PerformanceSongId",
        to = "super::performance_song::Column::Id",
        on_delete = "Cascade"
    )]
    PerformanceSong,
}

impl Related<super::performance_song::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PerformanceSong.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for PerformanceMusician {
    fn from(model: Model) -> Self {
        PerformanceMusician {
            id: model.id,
            user_id: model.user_id,
            instrument: model.instrument,
            is_solo: model.is_solo,
            is_accompanist: model.is_accompanist,
        }
    }
}
