//! Role and category guards.
//!
//! A route group declares an [`AccessPolicy`]; the guard middleware checks it
//! against the authenticated principal after routing. `SUPER_ADMIN` passes
//! every role check.

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    Router,
};

use common::AppError;
use domain::{has_any_category, Category, Principal, Role};

/// Who may reach a route: any listed role, or any listed category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessPolicy {
    roles: &'static [Role],
    categories: &'static [Category],
}

impl AccessPolicy {
    pub const fn roles(roles: &'static [Role]) -> Self {
        Self {
            roles,
            categories: &[],
        }
    }

    pub const fn categories(categories: &'static [Category]) -> Self {
        Self {
            roles: &[],
            categories,
        }
    }

    /// Also admit principals holding one of `categories`.
    pub const fn or_categories(self, categories: &'static [Category]) -> Self {
        Self {
            roles: self.roles,
            categories,
        }
    }

    pub fn permits(&self, principal: &Principal) -> bool {
        principal.role.satisfies(self.roles)
            || has_any_category(&principal.categories, self.categories)
    }
}

async fn enforce(policy: AccessPolicy, request: Request, next: Next) -> Result<Response, AppError> {
    let permitted = request
        .extensions()
        .get::<Principal>()
        .map(|principal| (principal.id, policy.permits(principal)));

    match permitted {
        None => Err(AppError::Unauthorized),
        Some((principal_id, false)) => {
            tracing::debug!(
                principal_id,
                path = %request.uri().path(),
                "Access policy denied request"
            );
            Err(AppError::Forbidden)
        }
        Some((_, true)) => Ok(next.run(request).await),
    }
}

/// Attach an access policy to every route of a router.
pub trait Guarded {
    fn guarded(self, policy: AccessPolicy) -> Self;
}

impl<S> Guarded for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn guarded(self, policy: AccessPolicy) -> Self {
        self.route_layer(middleware::from_fn(move |request: Request, next: Next| {
            enforce(policy, request, next)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::PrincipalKind;

    fn principal(role: Role, categories: Vec<Category>) -> Principal {
        Principal {
            id: 1,
            kind: PrincipalKind::Member,
            email: "m@choir.test".to_string(),
            role,
            categories,
            choir_id: Some(1),
        }
    }

    #[test]
    fn listed_role_passes() {
        let policy = AccessPolicy::roles(&[Role::FinanceAdmin]);
        assert!(policy.permits(&principal(Role::FinanceAdmin, vec![])));
        assert!(!policy.permits(&principal(Role::AttendanceAdmin, vec![])));
    }

    #[test]
    fn super_admin_passes_every_role_guard() {
        let policy = AccessPolicy::roles(&[Role::ChoirAdmin]);
        assert!(policy.permits(&principal(Role::SuperAdmin, vec![])));
    }

    #[test]
    fn category_guard_needs_an_overlap() {
        let policy = AccessPolicy::categories(&[Category::Louado]);
        assert!(policy.permits(&principal(Role::ChoirMember, vec![Category::Singer, Category::Louado])));
        assert!(!policy.permits(&principal(Role::ChoirMember, vec![Category::Singer])));
    }

    #[test]
    fn role_or_category() {
        let policy = AccessPolicy::roles(&[Role::ChoirAdmin]).or_categories(&[Category::Committee]);
        assert!(policy.permits(&principal(Role::ChoirAdmin, vec![])));
        assert!(policy.permits(&principal(Role::ChoirMember, vec![Category::Committee])));
        assert!(!policy.permits(&principal(Role::FinanceAdmin, vec![Category::Musician])));
    }
}
