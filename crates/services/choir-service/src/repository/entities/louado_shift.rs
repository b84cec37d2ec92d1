//! Louado shift database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::LouadoShift;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "louado_shifts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub start_date: Date,
    pub end_date: Date,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for LouadoShift {
    fn from(model: Model) -> Self {
        LouadoShift {
            id: model.id,
            user_id: model.user_id,
            start_date: model.start_date,
            end_date: model.end_date,
            notes: model.notes,
            created_at: model.created_at,
        }
    }
}
