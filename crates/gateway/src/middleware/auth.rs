//! Authentication middleware.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use common::AppError;
use domain::BEARER_TOKEN_PREFIX;

use crate::state::AppState;

/// Routes reachable without a token.
const PUBLIC_PATHS: &[&str] = &["/health", "/auth/login", "/auth/admin/login"];

/// Path prefixes reachable without a token (API docs).
const PUBLIC_PREFIXES: &[&str] = &["/swagger-ui", "/api-docs"];

pub fn is_public(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path.trim_end_matches('/'))
        || PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Global JWT middleware.
///
/// Every route outside the public allowlist needs `Authorization: Bearer <jwt>`.
/// The principal is reloaded from the account the token names and stored in
/// the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if is_public(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let principal = {
        let token = bearer_token(request.headers()).ok_or(AppError::Unauthorized)?;
        state.services.auth().authenticate(token).await?
    };
    tracing::debug!(
        principal_id = principal.id,
        kind = ?principal.kind,
        role = %principal.role,
        "Request authenticated"
    );

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn allowlist_covers_login_health_and_docs() {
        assert!(is_public("/health"));
        assert!(is_public("/auth/login"));
        assert!(is_public("/auth/admin/login"));
        assert!(is_public("/swagger-ui/index.html"));
        assert!(is_public("/api-docs/openapi.json"));
    }

    #[test]
    fn everything_else_needs_a_token() {
        assert!(!is_public("/auth/me"));
        assert!(!is_public("/users"));
        assert!(!is_public("/healthz"));
    }

    #[test]
    fn bearer_prefix_is_required() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
