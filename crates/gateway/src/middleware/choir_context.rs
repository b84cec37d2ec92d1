//! Choir (tenant) context.
//!
//! Runs after authentication. Members and choir-bound admins are pinned to
//! their own choir; super admins may pick one with `X-Choir-Id` or work
//! across all choirs.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use common::{AppError, AppResult};
use domain::{ChoirScope, Principal};

pub const CHOIR_ID_HEADER: &str = "x-choir-id";

/// Choir scope of the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoirContext {
    pub scope: ChoirScope,
}

/// Work out which choir a principal acts on.
pub fn resolve_scope(principal: &Principal, requested: Option<i32>) -> AppResult<ChoirScope> {
    if principal.is_super_admin() {
        return Ok(requested.map_or(ChoirScope::All, ChoirScope::Choir));
    }

    match (principal.choir_id, requested) {
        (Some(own), Some(other)) if own != other => {
            tracing::debug!(
                principal_id = principal.id,
                own_choir = own,
                requested_choir = other,
                "Choir switch refused"
            );
            Err(AppError::Forbidden)
        }
        (Some(own), _) => Ok(ChoirScope::Choir(own)),
        (None, Some(_)) => Err(AppError::Forbidden),
        (None, None) => Ok(ChoirScope::Unaffiliated),
    }
}

fn requested_choir(headers: &HeaderMap) -> AppResult<Option<i32>> {
    let Some(value) = headers.get(CHOIR_ID_HEADER) else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse::<i32>().ok())
        .map(Some)
        .ok_or_else(|| AppError::bad_request("X-Choir-Id must be a numeric choir id"))
}

pub async fn choir_context_middleware(
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let context = match request.extensions().get::<Principal>() {
        Some(principal) => Some(ChoirContext {
            scope: resolve_scope(principal, requested_choir(request.headers())?)?,
        }),
        None => None,
    };

    if let Some(context) = context {
        request.extensions_mut().insert(context);
    }

    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for ChoirContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ChoirContext>()
            .copied()
            .ok_or(AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use domain::{PrincipalKind, Role};

    fn principal(role: Role, choir_id: Option<i32>) -> Principal {
        Principal {
            id: 3,
            kind: PrincipalKind::Admin,
            email: "a@choir.test".to_string(),
            role,
            categories: vec![],
            choir_id,
        }
    }

    #[test]
    fn members_are_pinned_to_their_choir() {
        let member = principal(Role::ChoirAdmin, Some(2));
        assert_eq!(resolve_scope(&member, None).unwrap(), ChoirScope::Choir(2));
        assert_eq!(resolve_scope(&member, Some(2)).unwrap(), ChoirScope::Choir(2));
    }

    #[test]
    fn switching_to_another_choir_is_forbidden() {
        let member = principal(Role::ChoirAdmin, Some(2));
        assert!(matches!(resolve_scope(&member, Some(5)), Err(AppError::Forbidden)));

        let unaffiliated = principal(Role::FinanceAdmin, None);
        assert!(matches!(resolve_scope(&unaffiliated, Some(5)), Err(AppError::Forbidden)));
    }

    #[test]
    fn unaffiliated_accounts_see_unaffiliated_rows() {
        let admin = principal(Role::FinanceAdmin, None);
        assert_eq!(resolve_scope(&admin, None).unwrap(), ChoirScope::Unaffiliated);
    }

    #[test]
    fn super_admin_selects_or_spans_choirs() {
        let root = principal(Role::SuperAdmin, Some(1));
        assert_eq!(resolve_scope(&root, None).unwrap(), ChoirScope::All);
        assert_eq!(resolve_scope(&root, Some(9)).unwrap(), ChoirScope::Choir(9));
    }

    #[test]
    fn header_must_be_numeric() {
        let mut headers = HeaderMap::new();
        assert_eq!(requested_choir(&headers).unwrap(), None);

        headers.insert(CHOIR_ID_HEADER, HeaderValue::from_static(" 4 "));
        assert_eq!(requested_choir(&headers).unwrap(), Some(4));

        headers.insert(CHOIR_ID_HEADER, HeaderValue::from_static("main"));
        assert!(matches!(requested_choir(&headers), Err(AppError::BadRequest(_))));
    }
}
