//! Communique database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{Category, Communique};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "communiques")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub choir_id: Option<i32>,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub target_categories: Vec<String>,
    pub published_at: Option<DateTimeUtc>,
    pub author_id: Option<i32>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Communique {
    fn from(model: Model) -> Self {
        Communique {
            id: model.id,
            choir_id: model.choir_id,
            title: model.title,
            content: model.content,
            target_categories: Category::parse_all(&model.target_categories),
            published_at: model.published_at,
            author_id: model.author_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
