//! Song slot within a performance.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "performance_songs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub performance_id: i32,
    pub song_id: i32,
    pub song_order: i32,
    pub musical_key: Option<String>,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::performance::Entity",
        from = "Column::PerformanceId",
        to = "super::performance::Column::Id",
        on_delete = "Cascade"
    )]
    Performance,
    #[sea_orm(has_many = "super::performance_song_musician::Entity")]
    Musicians,
    #[sea_orm(has_many = "super::performance_voice_part::Entity")]
    VoiceParts,
}

impl Related<super::performance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Performance.def()
    }
}

impl Related<super::performance_song_musician::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Musicians.def()
    }
}

impl Related<super::performance_voice_part::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VoiceParts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
