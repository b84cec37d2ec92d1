//! Performance database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::Performance;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "performances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub venue: Option<String>,
    pub performance_date: DateTimeUtc,
    pub description: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::performance_song::Entity")]
    Songs,
}

impl Related<super::performance_song::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Songs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Performance {
    fn from(model: Model) -> Self {
        Performance {
            id: model.id,
            title: model.title,
            venue: model.venue,
            performance_date: model.performance_date,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
