//! Roles and categories used by the access guards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Role held by a member or admin account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(
    feature = "persistence",
    derive(sea_orm::EnumIter, sea_orm::DeriveActiveEnum)
)]
#[cfg_attr(
    feature = "persistence",
    sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")
)]
pub enum Role {
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "SUPER_ADMIN"))]
    SuperAdmin,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "CHOIR_ADMIN"))]
    ChoirAdmin,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "ATTENDANCE_ADMIN"))]
    AttendanceAdmin,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "FINANCE_ADMIN"))]
    FinanceAdmin,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "CHOIR_MEMBER"))]
    ChoirMember,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::SuperAdmin,
        Role::ChoirAdmin,
        Role::AttendanceAdmin,
        Role::FinanceAdmin,
        Role::ChoirMember,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::ChoirAdmin => "CHOIR_ADMIN",
            Role::AttendanceAdmin => "ATTENDANCE_ADMIN",
            Role::FinanceAdmin => "FINANCE_ADMIN",
            Role::ChoirMember => "CHOIR_MEMBER",
        }
    }

    pub fn is_super_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }

    /// Whether this role satisfies a role guard listing `allowed`.
    ///
    /// `SUPER_ADMIN` satisfies every guard.
    pub fn satisfies(&self, allowed: &[Role]) -> bool {
        self.is_super_admin() || allowed.contains(self)
    }

    /// Roles that may only be granted by a super admin.
    pub fn requires_super_admin_to_grant(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("Unknown role '{}'", s)))
    }
}

/// Tag-like attribute on a member, checked by category guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Category {
    Singer,
    Musician,
    Committee,
    Advisor,
    Louado,
    Leader,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Singer,
        Category::Musician,
        Category::Committee,
        Category::Advisor,
        Category::Louado,
        Category::Leader,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Singer => "SINGER",
            Category::Musician => "MUSICIAN",
            Category::Committee => "COMMITTEE",
            Category::Advisor => "ADVISOR",
            Category::Louado => "LOUADO",
            Category::Leader => "LEADER",
        }
    }

    /// Parse stored category tags, dropping any that are no longer known.
    pub fn parse_all<I, S>(tags: I) -> Vec<Category>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tags.into_iter()
            .filter_map(|tag| tag.as_ref().parse().ok())
            .collect()
    }

    /// Render categories as storage tags, sorted and de-duplicated.
    pub fn to_tags(categories: &[Category]) -> Vec<String> {
        let mut sorted = categories.to_vec();
        sorted.sort();
        sorted.dedup();
        sorted.iter().map(|c| c.as_str().to_string()).collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("Unknown category '{}'", s)))
    }
}

/// Category guard: passes when the member holds at least one required category.
pub fn has_any_category(held: &[Category], required: &[Category]) -> bool {
    required.iter().any(|category| held.contains(category))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn super_admin_satisfies_every_guard() {
        assert!(Role::SuperAdmin.satisfies(&[Role::FinanceAdmin]));
        assert!(Role::SuperAdmin.satisfies(&[]));
    }

    #[test]
    fn other_roles_need_to_be_listed() {
        assert!(Role::FinanceAdmin.satisfies(&[Role::FinanceAdmin, Role::ChoirAdmin]));
        assert!(!Role::ChoirMember.satisfies(&[Role::FinanceAdmin]));
        assert!(!Role::ChoirAdmin.satisfies(&[]));
    }

    #[test]
    fn role_round_trips_through_strings() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn role_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&Role::AttendanceAdmin).unwrap();
        assert_eq!(json, "\"ATTENDANCE_ADMIN\"");
    }

    #[test]
    fn category_guard_is_set_intersection() {
        let held = [Category::Singer, Category::Louado];
        assert!(has_any_category(&held, &[Category::Louado]));
        assert!(!has_any_category(&held, &[Category::Committee]));
        assert!(!has_any_category(&[], &[Category::Committee]));
        assert!(!has_any_category(&held, &[]));
    }

    #[test]
    fn stored_tags_drop_unknown_values() {
        let parsed = Category::parse_all(["SINGER", "retired", "LEADER"]);
        assert_eq!(parsed, vec![Category::Singer, Category::Leader]);
    }

    #[test]
    fn tags_are_sorted_and_unique() {
        let tags = Category::to_tags(&[Category::Louado, Category::Singer, Category::Louado]);
        assert_eq!(tags, vec!["SINGER".to_string(), "LOUADO".to_string()]);
    }
}
