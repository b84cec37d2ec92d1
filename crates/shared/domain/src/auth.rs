//! Access token payloads.

use serde::{Deserialize, Serialize};

use crate::access::{Category, Role};
use crate::user::{Principal, PrincipalKind};

/// JWT claims. The principal is rebuilt from the claims on every request,
/// so role or category changes take effect at the next login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: i32,
    pub kind: PrincipalKind,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub categories: Vec<Category>,
    pub choir_id: Option<i32>,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(principal: &Principal, issued_at: i64, expires_at: i64) -> Self {
        Self {
            sub: principal.id,
            kind: principal.kind,
            email: principal.email.clone(),
            role: principal.role,
            categories: principal.categories.clone(),
            choir_id: principal.choir_id,
            iat: issued_at,
            exp: expires_at,
        }
    }

    pub fn principal(&self) -> Principal {
        Principal {
            id: self.sub,
            kind: self.kind,
            email: self.email.clone(),
            role: self.role,
            categories: self.categories.clone(),
            choir_id: self.choir_id,
        }
    }
}

/// Token response returned after successful authentication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TokenResponse {
    /// JWT access token
    pub access_token: String,
    /// Always "Bearer"
    pub token_type: String,
    /// Lifetime in seconds
    pub expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_round_trip_the_principal() {
        let principal = Principal {
            id: 4,
            kind: PrincipalKind::Member,
            email: "m@example.com".to_string(),
            role: Role::ChoirMember,
            categories: vec![Category::Louado],
            choir_id: Some(2),
        };
        let claims = Claims::new(&principal, 10, 20);
        assert_eq!(claims.principal(), principal);

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["choirId"], 2);
        assert_eq!(json["kind"], "member");
        assert_eq!(json["role"], "CHOIR_MEMBER");
    }

    #[test]
    fn token_response_is_camel_case() {
        let token = TokenResponse {
            access_token: "abc".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 3600,
        };
        let json = serde_json::to_value(token).unwrap();
        assert_eq!(json["accessToken"], "abc");
        assert_eq!(json["expiresIn"], 3600);
    }
}
