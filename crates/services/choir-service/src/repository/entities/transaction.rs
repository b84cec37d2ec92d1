//! Financial transaction database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{Transaction, TransactionCategory, TransactionType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub choir_id: Option<i32>,
    #[sea_orm(column_name = "type")]
    pub transaction_type: TransactionType,
    pub category: TransactionCategory,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub amount: Decimal,
    pub currency: String,
    pub description: Option<String>,
    pub contributor_id: Option<i32>,
    pub transaction_date: Date,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Transaction {
    fn from(model: Model) -> Self {
        Transaction {
            id: model.id,
            choir_id: model.choir_id,
            transaction_type: model.transaction_type,
            category: model.category,
            amount: model.amount,
            currency: model.currency.trim_end().to_string(),
            description: model.description,
            contributor_id: model.contributor_id,
            transaction_date: model.transaction_date,
            created_at: model.created_at,
        }
    }
}
