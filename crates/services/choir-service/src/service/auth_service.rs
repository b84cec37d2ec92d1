//! Authentication service - issues and verifies access tokens.
//!
//! Members and admin accounts live in separate tables and log in through
//! separate endpoints, but both end up as a [`Principal`] inside the token.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::repository::{AdminUserRepository, UserRepository};
use common::{AppError, AppResult, JwtConfig};
use domain::{
    normalize_email, Claims, Password, Principal, PrincipalKind, TokenResponse, User,
    DUMMY_PASSWORD_HASH, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER,
};

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Login as a choir member
    async fn login_member(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Login as a back-office admin
    async fn login_admin(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Sign a token for an already authenticated principal
    fn issue_token(&self, principal: &Principal) -> AppResult<TokenResponse>;

    /// Verify a JWT and rebuild the principal it carries
    fn verify_token(&self, token: &str) -> AppResult<Principal>;

    /// Verify a JWT and reload the account it names. Role, categories and
    /// choir come from the stored account; disabled or expelled accounts
    /// are refused even while the token is still valid.
    async fn authenticate(&self, token: &str) -> AppResult<Principal>;
}

pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    admins: Arc<dyn AdminUserRepository>,
    jwt: JwtConfig,
}

impl Authenticator {
    pub fn new(
        users: Arc<dyn UserRepository>,
        admins: Arc<dyn AdminUserRepository>,
        jwt: JwtConfig,
    ) -> Self {
        Self { users, admins, jwt }
    }

    fn secret(&self) -> &[u8] {
        self.jwt.secret.as_bytes()
    }
}

/// Verify even when the account is unknown so response timing does not
/// reveal which emails exist.
fn password_matches(stored_hash: Option<&str>, candidate: &str) -> bool {
    let hash = stored_hash.unwrap_or(DUMMY_PASSWORD_HASH);
    Password::from_hash(hash).verify(candidate) && stored_hash.is_some()
}

#[async_trait]
impl AuthService for Authenticator {
    async fn login_member(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let user = self.users.find_by_email(&normalize_email(&email)).await?;
        let stored = user.as_ref().and_then(|u| u.password_hash.as_deref());

        if !password_matches(stored, &password) {
            tracing::info!("Member login rejected");
            return Err(AppError::InvalidCredentials);
        }
        match user {
            Some(user) if user.can_sign_in() => {
                tracing::info!(user_id = user.id, "Member logged in");
                self.issue_token(&Principal::from(&user))
            }
            _ => {
                tracing::info!("Member login rejected for inactive or expelled account");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    async fn login_admin(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let admin = self.admins.find_by_email(&normalize_email(&email)).await?;
        let stored = admin.as_ref().map(|a| a.password_hash.as_str());

        if !password_matches(stored, &password) {
            tracing::info!("Admin login rejected");
            return Err(AppError::InvalidCredentials);
        }
        match admin {
            Some(admin) if admin.is_active => {
                tracing::info!(admin_id = admin.id, "Admin logged in");
                self.issue_token(&Principal::from(&admin))
            }
            _ => Err(AppError::InvalidCredentials),
        }
    }

    fn issue_token(&self, principal: &Principal) -> AppResult<TokenResponse> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.jwt.expiration_hours);
        let claims = Claims::new(principal, now.timestamp(), expires_at.timestamp());

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret()),
        )?;

        Ok(TokenResponse {
            access_token: token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.jwt.expiration_hours * SECONDS_PER_HOUR,
        })
    }

    fn verify_token(&self, token: &str) -> AppResult<Principal> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret()),
            &Validation::default(),
        )?;

        Ok(token_data.claims.principal())
    }

    async fn authenticate(&self, token: &str) -> AppResult<Principal> {
        let claimed = self.verify_token(token)?;

        let current = match claimed.kind {
            PrincipalKind::Member => self
                .users
                .find_by_id(claimed.id)
                .await?
                .filter(User::can_sign_in)
                .map(|user| Principal::from(&user)),
            PrincipalKind::Admin => self
                .admins
                .find_by_id(claimed.id)
                .await?
                .filter(|admin| admin.is_active)
                .map(|admin| Principal::from(&admin)),
        };

        current.ok_or_else(|| {
            tracing::info!(
                principal_id = claimed.id,
                kind = ?claimed.kind,
                "Token refused for disabled account"
            );
            AppError::Unauthorized
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockAdminUserRepository, MockUserRepository};
    use crate::service::test_support::{admin_account, member, member_with_status, PASSWORD};
    use domain::{Category, MemberStatus, Role};
    use mockall::predicate::eq;

    fn jwt() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-at-least-32-bytes!".to_string(),
            expiration_hours: 24,
        }
    }

    fn authenticator(users: MockUserRepository, admins: MockAdminUserRepository) -> Authenticator {
        Authenticator::new(Arc::new(users), Arc::new(admins), jwt())
    }

    #[tokio::test]
    async fn member_login_issues_verifiable_token() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|_| Ok(Some(member(11, Some(3)))));

        let auth = authenticator(users, MockAdminUserRepository::new());
        let token = auth
            .login_member("Member11@choir.test".to_string(), PASSWORD.to_string())
            .await
            .unwrap();

        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 24 * 3600);

        let principal = auth.verify_token(&token.access_token).unwrap();
        assert_eq!(principal.id, 11);
        assert_eq!(principal.kind, PrincipalKind::Member);
        assert_eq!(principal.choir_id, Some(3));
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|_| Ok(Some(member(11, Some(3)))));

        let auth = authenticator(users, MockAdminUserRepository::new());
        let result = auth
            .login_member("member11@choir.test".to_string(), "not-the-password".to_string())
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn unknown_email_is_rejected() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));

        let auth = authenticator(users, MockAdminUserRepository::new());
        let result = auth
            .login_member("ghost@choir.test".to_string(), PASSWORD.to_string())
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn expelled_member_cannot_log_in() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|_| Ok(Some(member_with_status(4, MemberStatus::Expelled))));

        let auth = authenticator(users, MockAdminUserRepository::new());
        let result = auth
            .login_member("member4@choir.test".to_string(), PASSWORD.to_string())
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn deactivated_member_cannot_log_in() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| {
            let mut user = member(4, Some(1));
            user.is_active = false;
            Ok(Some(user))
        });

        let auth = authenticator(users, MockAdminUserRepository::new());
        let result = auth
            .login_member("member4@choir.test".to_string(), PASSWORD.to_string())
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn admin_login_carries_role_and_choir() {
        let mut admins = MockAdminUserRepository::new();
        admins
            .expect_find_by_email()
            .returning(|_| Ok(Some(admin_account(2, Role::FinanceAdmin, Some(5)))));

        let auth = authenticator(MockUserRepository::new(), admins);
        let token = auth
            .login_admin("admin2@choir.test".to_string(), PASSWORD.to_string())
            .await
            .unwrap();

        let principal = auth.verify_token(&token.access_token).unwrap();
        assert_eq!(principal.kind, PrincipalKind::Admin);
        assert_eq!(principal.role, Role::FinanceAdmin);
        assert_eq!(principal.member_id(), None);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let auth = authenticator(MockUserRepository::new(), MockAdminUserRepository::new());
        let principal = Principal::from(&member(1, None));
        let token = auth.issue_token(&principal).unwrap().access_token;

        let other = Authenticator::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockAdminUserRepository::new()),
            JwtConfig {
                secret: "another-secret-of-sufficient-length!!".to_string(),
                expiration_hours: 24,
            },
        );

        assert!(matches!(other.verify_token(&token), Err(AppError::Jwt(_))));
        tokio_test::assert_err!(auth.verify_token("not.a.token"));
    }

    #[tokio::test]
    async fn authenticate_reads_role_from_stored_account() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().with(eq(11)).returning(|id| {
            let mut demoted = member(id, Some(3));
            demoted.role = Role::ChoirMember;
            demoted.categories = vec![Category::Singer];
            Ok(Some(demoted))
        });

        let auth = authenticator(users, MockAdminUserRepository::new());
        let mut stale = Principal::from(&member(11, Some(3)));
        stale.role = Role::FinanceAdmin;
        stale.categories = vec![Category::Louado];
        let token = auth.issue_token(&stale).unwrap().access_token;

        let principal = auth.authenticate(&token).await.unwrap();
        assert_eq!(principal.role, Role::ChoirMember);
        assert_eq!(principal.categories, vec![Category::Singer]);
    }

    #[tokio::test]
    async fn expelled_member_token_is_refused() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|id| Ok(Some(member_with_status(id, MemberStatus::Expelled))));

        let auth = authenticator(users, MockAdminUserRepository::new());
        let token = auth
            .issue_token(&Principal::from(&member(11, Some(1))))
            .unwrap()
            .access_token;

        let result = auth.authenticate(&token).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn deactivated_admin_token_is_refused() {
        let mut admins = MockAdminUserRepository::new();
        admins.expect_find_by_id().returning(|id| {
            let mut admin = admin_account(id, Role::ChoirAdmin, Some(1));
            admin.is_active = false;
            Ok(Some(admin))
        });

        let auth = authenticator(MockUserRepository::new(), admins);
        let token = auth
            .issue_token(&Principal::from(&admin_account(2, Role::ChoirAdmin, Some(1))))
            .unwrap()
            .access_token;

        let result = auth.authenticate(&token).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn deleted_account_token_is_refused() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let auth = authenticator(users, MockAdminUserRepository::new());
        let token = auth
            .issue_token(&Principal::from(&member(11, Some(1))))
            .unwrap()
            .access_token;

        tokio_test::assert_err!(auth.authenticate(&token).await);
    }
}
