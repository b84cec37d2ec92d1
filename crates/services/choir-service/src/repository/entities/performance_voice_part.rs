//! Voice part of a performance song.

use sea_orm::entity::prelude::*;

use domain::VoiceType;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "performance_voice_parts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub performance_song_id: i32,
    pub voice_type: VoiceType,
    pub notes: Option<String>,
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
    #[sea_orm(has_many = "super::performance_voice_part_member::Entity")]
    Members,
}

impl Related<super::performance_song::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PerformanceSong.def()
    }
}

impl Related<super::performance_voice_part_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
