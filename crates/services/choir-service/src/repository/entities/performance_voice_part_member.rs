//! Member singing in a voice part. Composite key, no surrogate id.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "performance_voice_part_members")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub voice_part_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::performance_voice_part::Entity",
        from = "Column::VoicePartId",
        to = "super::performance_voice_part::Column::Id",
        on_delete = "Cascade"
    )]
    VoicePart,
}

impl Related<super::performance_voice_part::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VoicePart.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
