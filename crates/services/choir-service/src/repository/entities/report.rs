//! Report database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{Report, ReportType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub choir_id: Option<i32>,
    pub title: String,
    pub report_type: ReportType,
    pub period_start: Date,
    pub period_end: Date,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub author_id: Option<i32>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Report {
    fn from(model: Model) -> Self {
        Report {
            id: model.id,
            choir_id: model.choir_id,
            title: model.title,
            report_type: model.report_type,
            period_start: model.period_start,
            period_end: model.period_end,
            content: model.content,
            author_id: model.author_id,
            created_at: model.created_at,
        }
    }
}
