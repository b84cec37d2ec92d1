//! Leave request database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{Leave, LeaveStatus, StatusReason};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "leaves")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub reason: String,
    pub start_date: Date,
    pub end_date: Date,
    pub status: LeaveStatus,
    pub note: Option<String>,
    pub reviewed_by: Option<i32>,
    pub reviewed_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Leave {
    fn from(model: Model) -> Self {
        Leave {
            id: model.id,
            user_id: model.user_id,
            reason: model.reason.parse().unwrap_or(StatusReason::Other),
            start_date: model.start_date,
            end_date: model.end_date,
            status: model.status,
            note: model.note,
            reviewed_by: model.reviewed_by,
            reviewed_at: model.reviewed_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
