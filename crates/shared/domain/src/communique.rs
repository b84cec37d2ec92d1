//! Announcements addressed to member categories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::access::{has_any_category, Category, Role};
use crate::user::Principal;

/// Choir admins and committee members write communiques.
pub fn can_manage_communiques(principal: &Principal) -> bool {
    principal.role.satisfies(&[Role::ChoirAdmin])
        || has_any_category(&principal.categories, &[Category::Committee])
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Communique {
    pub id: i32,
    pub choir_id: Option<i32>,
    pub title: String,
    pub content: String,
    /// Empty means everyone.
    pub target_categories: Vec<Category>,
    pub published_at: Option<DateTime<Utc>>,
    pub author_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Communique {
    pub fn is_published(&self) -> bool {
        self.published_at.is_some()
    }

    pub fn is_addressed_to(&self, categories: &[Category]) -> bool {
        self.target_categories.is_empty() || has_any_category(categories, &self.target_categories)
    }

    /// What a regular member may read: published and addressed to them.
    pub fn visible_to_member(&self, categories: &[Category]) -> bool {
        self.is_published() && self.is_addressed_to(categories)
    }
}

#[derive(Debug, Clone)]
pub struct NewCommunique {
    pub choir_id: Option<i32>,
    pub title: String,
    pub content: String,
    pub target_categories: Vec<Category>,
    pub author_id: Option<i32>,
    pub publish: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CommuniqueChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub target_categories: Option<Vec<Category>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn communique(targets: Vec<Category>, published: bool) -> Communique {
        let now = Utc::now();
        Communique {
            id: 1,
            choir_id: Some(1),
            title: "Retreat".to_string(),
            content: "Bus leaves at 7".to_string(),
            target_categories: targets,
            published_at: published.then_some(now),
            author_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn untargeted_communique_reaches_everyone() {
        assert!(communique(vec![], true).visible_to_member(&[]));
    }

    #[test]
    fn targeted_communique_needs_matching_category() {
        let c = communique(vec![Category::Musician, Category::Leader], true);
        assert!(c.visible_to_member(&[Category::Singer, Category::Musician]));
        assert!(!c.visible_to_member(&[Category::Singer]));
    }

    #[test]
    fn drafts_are_hidden_from_members() {
        assert!(!communique(vec![], false).visible_to_member(&[Category::Singer]));
    }

    #[test]
    fn committee_members_and_choir_admins_manage_communiques() {
        let mut principal = Principal {
            id: 1,
            kind: crate::user::PrincipalKind::Member,
            email: "c@example.com".to_string(),
            role: Role::ChoirMember,
            categories: vec![Category::Singer],
            choir_id: Some(1),
        };
        assert!(!can_manage_communiques(&principal));

        principal.categories.push(Category::Committee);
        assert!(can_manage_communiques(&principal));

        principal.categories.clear();
        principal.role = Role::ChoirAdmin;
        assert!(can_manage_communiques(&principal));
    }
}
