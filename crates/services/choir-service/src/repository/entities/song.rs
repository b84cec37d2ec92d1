//! Song database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::Song;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "songs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub composer: Option<String>,
    pub genre: Option<String>,
    pub language: Option<String>,
    pub musical_key: Option<String>,
    pub lyrics: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Song {
    fn from(model: Model) -> Self {
        Song {
            id: model.id,
            title: model.title,
            composer: model.composer,
            genre: model.genre,
            language: model.language,
            musical_key: model.musical_key,
            lyrics: model.lyrics,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
