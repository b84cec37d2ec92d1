//! Member and admin account entities.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::access::{Category, Role};
use crate::status::{MemberStatus, StatusReason};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(
    feature = "persistence",
    derive(sea_orm::EnumIter, sea_orm::DeriveActiveEnum)
)]
#[cfg_attr(
    feature = "persistence",
    sea_orm(rs_type = "String", db_type = "Enum", enum_name = "gender")
)]
pub enum Gender {
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "MALE"))]
    Male,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "FEMALE"))]
    Female,
}

/// Choir member.
///
/// Members are never hard-deleted; `is_active` carries the soft state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub choir_id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub gender: Gender,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub profile_image_url: Option<String>,
    pub categories: Vec<Category>,
    pub role: Role,
    pub status: Option<MemberStatus>,
    pub status_reason: Option<StatusReason>,
    pub is_active: bool,
    pub joined_at: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn has_category(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    /// Whether the member may sign in.
    pub fn can_sign_in(&self) -> bool {
        self.is_active
            && self.password_hash.is_some()
            && self.status != Some(MemberStatus::Expelled)
    }
}

/// Data needed to register a member.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub choir_id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub password_hash: Option<String>,
    pub gender: Gender,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub categories: Vec<Category>,
    pub role: Role,
    pub joined_at: NaiveDate,
}

/// Profile fields an admin may edit. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserProfileChanges {
    pub choir_id: Option<i32>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub profile_image_url: Option<String>,
}

/// Filters for the member list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilter {
    pub status: Option<MemberStatus>,
    pub category: Option<Category>,
    pub is_active: Option<bool>,
}

/// Member as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserResponse {
    pub id: i32,
    pub choir_id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub gender: Gender,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub profile_image_url: Option<String>,
    pub categories: Vec<Category>,
    pub role: Role,
    pub status: Option<MemberStatus>,
    pub status_reason: Option<StatusReason>,
    pub is_active: bool,
    pub joined_at: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            choir_id: user.choir_id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone_number: user.phone_number,
            gender: user.gender,
            date_of_birth: user.date_of_birth,
            address: user.address,
            profile_image_url: user.profile_image_url,
            categories: user.categories,
            role: user.role,
            status: user.status,
            status_reason: user.status_reason,
            is_active: user.is_active,
            joined_at: user.joined_at,
            created_at: user.created_at,
        }
    }
}

/// Back-office account that administers the organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: i32,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
    pub choir_id: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAdminUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
    pub choir_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AdminUserResponse {
    pub id: i32,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub choir_id: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<AdminUser> for AdminUserResponse {
    fn from(admin: AdminUser) -> Self {
        Self {
            id: admin.id,
            email: admin.email,
            full_name: admin.full_name,
            role: admin.role,
            choir_id: admin.choir_id,
            is_active: admin.is_active,
            created_at: admin.created_at,
        }
    }
}

/// Which account table an authenticated principal comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum PrincipalKind {
    Member,
    Admin,
}

/// Identity carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Principal {
    pub id: i32,
    pub kind: PrincipalKind,
    pub email: String,
    pub role: Role,
    pub categories: Vec<Category>,
    pub choir_id: Option<i32>,
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            kind: PrincipalKind::Member,
            email: user.email.clone(),
            role: user.role,
            categories: user.categories.clone(),
            choir_id: user.choir_id,
        }
    }
}

impl From<&AdminUser> for Principal {
    fn from(admin: &AdminUser) -> Self {
        Self {
            id: admin.id,
            kind: PrincipalKind::Admin,
            email: admin.email.clone(),
            role: admin.role,
            categories: Vec::new(),
            choir_id: admin.choir_id,
        }
    }
}

impl Principal {
    pub fn is_super_admin(&self) -> bool {
        self.role.is_super_admin()
    }

    /// Member id when the principal is a member account.
    pub fn member_id(&self) -> Option<i32> {
        match self.kind {
            PrincipalKind::Member => Some(self.id),
            PrincipalKind::Admin => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> User {
        let now = Utc::now();
        User {
            id: 7,
            choir_id: Some(1),
            first_name: "Aline".to_string(),
            last_name: "Uwase".to_string(),
            email: "aline@example.com".to_string(),
            phone_number: None,
            password_hash: Some("hash".to_string()),
            gender: Gender::Female,
            date_of_birth: None,
            address: None,
            profile_image_url: None,
            categories: vec![Category::Singer],
            role: Role::ChoirMember,
            status: None,
            status_reason: None,
            is_active: true,
            joined_at: now.date_naive(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn expelled_or_inactive_members_cannot_sign_in() {
        let mut user = member();
        assert!(user.can_sign_in());

        user.status = Some(MemberStatus::Expelled);
        assert!(!user.can_sign_in());

        let mut inactive = member();
        inactive.is_active = false;
        assert!(!inactive.can_sign_in());

        let mut no_password = member();
        no_password.password_hash = None;
        assert!(!no_password.can_sign_in());
    }

    #[test]
    fn response_hides_password_hash() {
        let json = serde_json::to_value(UserResponse::from(member())).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["firstName"], "Aline");
        assert_eq!(json["categories"][0], "SINGER");
    }

    #[test]
    fn principal_from_member_carries_categories() {
        let principal = Principal::from(&member());
        assert_eq!(principal.kind, PrincipalKind::Member);
        assert_eq!(principal.member_id(), Some(7));
        assert_eq!(principal.categories, vec![Category::Singer]);
    }
}
