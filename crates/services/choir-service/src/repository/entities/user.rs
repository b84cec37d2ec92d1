//! Member database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{Category, Gender, MemberStatus, Role, User};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub choir_id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone_number: Option<String>,
    pub password_hash: Option<String>,
    pub gender: Gender,
    pub date_of_birth: Option<Date>,
    pub address: Option<String>,
    pub profile_image_url: Option<String>,
    /// Category tags, stored as `text[]`
    pub categories: Vec<String>,
    pub role: Role,
    pub status: Option<MemberStatus>,
    pub status_reason: Option<String>,
    pub is_active: bool,
    pub joined_at: Date,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::choir::Entity",
        from = "Column::ChoirId",
        to = "super::choir::Column::Id",
        on_delete = "SetNull"
    )]
    Choir,
}

impl Related<super::choir::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Choir.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            choir_id: model.choir_id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            phone_number: model.phone_number,
            password_hash: model.password_hash,
            gender: model.gender,
            date_of_birth: model.date_of_birth,
            address: model.address,
            profile_image_url: model.profile_image_url,
            categories: Category::parse_all(&model.categories),
            role: model.role,
            status: model.status,
            status_reason: model.status_reason.and_then(|r| r.parse().ok()),
            is_active: model.is_active,
            joined_at: model.joined_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
