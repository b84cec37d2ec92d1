//! Member and admin account management.

use std::sync::Arc;

use async_trait::async_trait;

use super::within_scope;
use crate::repository::{AdminUserRepository, UserRepository};
use common::{AppError, AppResult, OptionExt};
use domain::{
    normalize_email, validate_status_change, AdminUser, Category, ChoirScope, MemberStatus,
    NewAdminUser, NewUser, Password, Principal, Role, StatusReason, User, UserFilter,
    UserProfileChanges,
};

/// Member service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn list_users(&self, scope: ChoirScope, filter: UserFilter) -> AppResult<Vec<User>>;

    async fn get_user(&self, scope: ChoirScope, id: i32) -> AppResult<User>;

    /// The member behind a member token
    async fn me(&self, principal: &Principal) -> AppResult<User>;

    /// Register a member. `password` is optional; members without one cannot log in.
    async fn create_user(
        &self,
        actor: &Principal,
        scope: ChoirScope,
        user: NewUser,
        password: Option<String>,
    ) -> AppResult<User>;

    async fn update_profile(
        &self,
        scope: ChoirScope,
        id: i32,
        changes: UserProfileChanges,
    ) -> AppResult<User>;

    /// Apply a status change through the lifecycle table
    async fn change_status(
        &self,
        scope: ChoirScope,
        id: i32,
        status: MemberStatus,
        reason: StatusReason,
    ) -> AppResult<User>;

    async fn change_role(
        &self,
        actor: &Principal,
        scope: ChoirScope,
        id: i32,
        role: Role,
    ) -> AppResult<User>;

    async fn change_categories(
        &self,
        scope: ChoirScope,
        id: i32,
        categories: Vec<Category>,
    ) -> AppResult<User>;

    async fn deactivate_user(&self, scope: ChoirScope, id: i32) -> AppResult<User>;

    async fn restore_user(&self, scope: ChoirScope, id: i32) -> AppResult<User>;
}

pub struct UserManager {
    repo: Arc<dyn UserRepository>,
}

impl UserManager {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    async fn scoped(&self, scope: ChoirScope, id: i32) -> AppResult<User> {
        within_scope(scope, self.repo.find_by_id(id).await?)
    }

    async fn ensure_email_free(&self, email: &str, current: Option<i32>) -> AppResult<()> {
        match self.repo.find_by_email(email).await? {
            Some(existing) if Some(existing.id) != current => Err(AppError::conflict("Email")),
            _ => Ok(()),
        }
    }
}

/// Only a super admin may hand out or take away the super admin role.
fn ensure_may_grant(actor: &Principal, role: Role) -> AppResult<()> {
    if role.requires_super_admin_to_grant() && !actor.is_super_admin() {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

#[async_trait]
impl UserService for UserManager {
    async fn list_users(&self, scope: ChoirScope, filter: UserFilter) -> AppResult<Vec<User>> {
        self.repo.list(scope, filter).await
    }

    async fn get_user(&self, scope: ChoirScope, id: i32) -> AppResult<User> {
        self.scoped(scope, id).await
    }

    async fn me(&self, principal: &Principal) -> AppResult<User> {
        let id = principal.member_id().ok_or_not_found()?;
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }

    async fn create_user(
        &self,
        actor: &Principal,
        scope: ChoirScope,
        mut user: NewUser,
        password: Option<String>,
    ) -> AppResult<User> {
        ensure_may_grant(actor, user.role)?;

        user.email = normalize_email(&user.email);
        self.ensure_email_free(&user.email, None).await?;

        user.choir_id = scope.assign(user.choir_id);
        user.password_hash = match password {
            Some(plain) => Some(Password::new(&plain)?.into_string()),
            None => None,
        };

        let created = self.repo.create(user).await?;
        tracing::info!(user_id = created.id, choir_id = ?created.choir_id, "Member created");
        Ok(created)
    }

    async fn update_profile(
        &self,
        scope: ChoirScope,
        id: i32,
        mut changes: UserProfileChanges,
    ) -> AppResult<User> {
        self.scoped(scope, id).await?;

        if let Some(target) = changes.choir_id {
            if scope != ChoirScope::All && !scope.contains(Some(target)) {
                return Err(AppError::Forbidden);
            }
        }
        if let Some(email) = changes.email.as_mut() {
            *email = normalize_email(email);
            self.ensure_email_free(email, Some(id)).await?;
        }

        self.repo.update_profile(id, changes).await
    }

    async fn change_status(
        &self,
        scope: ChoirScope,
        id: i32,
        status: MemberStatus,
        reason: StatusReason,
    ) -> AppResult<User> {
        let user = self.scoped(scope, id).await?;
        validate_status_change(user.status, status, reason)?;

        let updated = self.repo.update_status(id, status, reason).await?;
        tracing::info!(user_id = id, status = %status, reason = %reason, "Member status changed");
        Ok(updated)
    }

    async fn change_role(
        &self,
        actor: &Principal,
        scope: ChoirScope,
        id: i32,
        role: Role,
    ) -> AppResult<User> {
        let user = self.scoped(scope, id).await?;
        ensure_may_grant(actor, role)?;
        ensure_may_grant(actor, user.role)?;

        let updated = self.repo.update_role(id, role).await?;
        tracing::info!(user_id = id, role = %role, "Member role changed");
        Ok(updated)
    }

    async fn change_categories(
        &self,
        scope: ChoirScope,
        id: i32,
        categories: Vec<Category>,
    ) -> AppResult<User> {
        self.scoped(scope, id).await?;
        self.repo.update_categories(id, categories).await
    }

    async fn deactivate_user(&self, scope: ChoirScope, id: i32) -> AppResult<User> {
        self.scoped(scope, id).await?;
        self.repo.set_active(id, false).await
    }

    async fn restore_user(&self, scope: ChoirScope, id: i32) -> AppResult<User> {
        self.scoped(scope, id).await?;
        self.repo.set_active(id, true).await
    }
}

/// Input for a new admin account.
#[derive(Debug, Clone)]
pub struct NewAdminAccount {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
    pub choir_id: Option<i32>,
}

#[async_trait]
pub trait AdminService: Send + Sync {
    async fn list_admins(&self) -> AppResult<Vec<AdminUser>>;

    /// Create an admin account; a taken email is a conflict
    async fn create_admin(&self, account: NewAdminAccount) -> AppResult<AdminUser>;

    async fn deactivate_admin(&self, id: i32) -> AppResult<AdminUser>;
}

pub struct AdminManager {
    repo: Arc<dyn AdminUserRepository>,
}

impl AdminManager {
    pub fn new(repo: Arc<dyn AdminUserRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl AdminService for AdminManager {
    async fn list_admins(&self) -> AppResult<Vec<AdminUser>> {
        self.repo.list().await
    }

    async fn create_admin(&self, account: NewAdminAccount) -> AppResult<AdminUser> {
        let email = normalize_email(&account.email);
        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Email"));
        }

        let password_hash = Password::new(&account.password)?.into_string();
        let created = self
            .repo
            .create(NewAdminUser {
                email,
                password_hash,
                full_name: account.full_name.trim().to_string(),
                role: account.role,
                choir_id: account.choir_id,
            })
            .await?;

        tracing::info!(admin_id = created.id, role = %created.role, "Admin account created");
        Ok(created)
    }

    async fn deactivate_admin(&self, id: i32) -> AppResult<AdminUser> {
        self.repo.set_active(id, false).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockAdminUserRepository, MockUserRepository};
    use crate::service::test_support::{as_admin, as_member, member, member_with_status};
    use domain::Gender;
    use mockall::predicate::eq;

    fn new_user(role: Role) -> NewUser {
        NewUser {
            choir_id: Some(7),
            first_name: "Eric".to_string(),
            last_name: "Mugisha".to_string(),
            email: "  Eric@Choir.TEST ".to_string(),
            phone_number: None,
            password_hash: None,
            gender: Gender::Male,
            date_of_birth: None,
            address: None,
            categories: vec![Category::Musician],
            role,
            joined_at: chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn get_user_outside_scope_is_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .with(eq(5))
            .returning(|id| Ok(Some(member(id, Some(2)))));

        let service = UserManager::new(Arc::new(repo));
        let result = service.get_user(ChoirScope::Choir(1), 5).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn get_user_inside_scope() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(member(id, Some(1)))));

        let service = UserManager::new(Arc::new(repo));
        let user = service.get_user(ChoirScope::Choir(1), 5).await.unwrap();

        assert_eq!(user.id, 5);
    }

    #[tokio::test]
    async fn me_for_admin_principal_is_not_found() {
        let repo = MockUserRepository::new();
        let service = UserManager::new(Arc::new(repo));

        let result = service.me(&as_admin(Role::SuperAdmin, None)).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn create_user_pins_choir_and_normalizes_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|email| {
                assert_eq!(email, "eric@choir.test");
                Ok(None)
            });
        repo.expect_create().returning(|new| {
            assert_eq!(new.choir_id, Some(1));
            assert!(new.password_hash.is_some());
            let mut user = member(42, new.choir_id);
            user.email = new.email;
            Ok(user)
        });

        let service = UserManager::new(Arc::new(repo));
        let created = service
            .create_user(
                &as_admin(Role::ChoirAdmin, Some(1)),
                ChoirScope::Choir(1),
                new_user(Role::ChoirMember),
                Some("long-enough-secret".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(created.email, "eric@choir.test");
    }

    #[tokio::test]
    async fn create_user_with_taken_email_conflicts() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Ok(Some(member(3, Some(1)))));
        repo.expect_create().never();

        let service = UserManager::new(Arc::new(repo));
        let result = service
            .create_user(
                &as_admin(Role::SuperAdmin, None),
                ChoirScope::All,
                new_user(Role::ChoirMember),
                None,
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn only_super_admin_creates_super_admins() {
        let mut repo = MockUserRepository::new();
        repo.expect_create().never();

        let service = UserManager::new(Arc::new(repo));
        let result = service
            .create_user(
                &as_admin(Role::ChoirAdmin, Some(1)),
                ChoirScope::Choir(1),
                new_user(Role::SuperAdmin),
                None,
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn change_status_follows_lifecycle() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(member(id, Some(1)))));
        repo.expect_update_status()
            .with(eq(8), eq(MemberStatus::Suspended), eq(StatusReason::Absenteeism))
            .returning(|id, status, reason| {
                let mut user = member(id, Some(1));
                user.status = Some(status);
                user.status_reason = Some(reason);
                Ok(user)
            });

        let service = UserManager::new(Arc::new(repo));
        let user = service
            .change_status(
                ChoirScope::All,
                8,
                MemberStatus::Suspended,
                StatusReason::Absenteeism,
            )
            .await
            .unwrap();

        assert_eq!(user.status, Some(MemberStatus::Suspended));
    }

    #[tokio::test]
    async fn change_status_rejects_reversal_from_suspended() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(member_with_status(id, MemberStatus::Suspended))));
        repo.expect_update_status().never();

        let service = UserManager::new(Arc::new(repo));
        let result = service
            .change_status(ChoirScope::All, 8, MemberStatus::OnLeave, StatusReason::Travel)
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn change_status_surfaces_refusal_under_lock() {
        // read says ON_LEAVE, but the row was expelled before the lock was taken
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(member_with_status(id, MemberStatus::OnLeave))));
        repo.expect_update_status().times(1).returning(|_, _, _| {
            Err(AppError::validation(
                "Cannot change member status from EXPELLED to SUSPENDED",
            ))
        });

        let service = UserManager::new(Arc::new(repo));
        let result = service
            .change_status(
                ChoirScope::Choir(1),
                8,
                MemberStatus::Suspended,
                StatusReason::Misconduct,
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn change_status_rejects_reason_for_other_status() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(member(id, Some(1)))));
        repo.expect_update_status().never();

        let service = UserManager::new(Arc::new(repo));
        let result = service
            .change_status(ChoirScope::All, 8, MemberStatus::Expelled, StatusReason::Birth)
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn choir_admin_cannot_demote_super_admin() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|id| {
            let mut user = member(id, Some(1));
            user.role = Role::SuperAdmin;
            Ok(Some(user))
        });
        repo.expect_update_role().never();

        let service = UserManager::new(Arc::new(repo));
        let actor = as_member(2, Role::ChoirAdmin, vec![]);
        let result = service
            .change_role(&actor, ChoirScope::Choir(1), 9, Role::ChoirMember)
            .await;

        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn scoped_caller_cannot_move_member_to_another_choir() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(member(id, Some(1)))));
        repo.expect_update_profile().never();

        let service = UserManager::new(Arc::new(repo));
        let changes = UserProfileChanges {
            choir_id: Some(2),
            ..Default::default()
        };
        let result = service
            .update_profile(ChoirScope::Choir(1), 4, changes)
            .await;

        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn create_admin_hashes_password() {
        let mut repo = MockAdminUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create().returning(|new| {
            assert_ne!(new.password_hash, "admin-password-1");
            assert!(new.password_hash.starts_with("$argon2"));
            let now = chrono::Utc::now();
            Ok(AdminUser {
                id: 1,
                email: new.email,
                password_hash: new.password_hash,
                full_name: new.full_name,
                role: new.role,
                choir_id: new.choir_id,
                is_active: true,
                created_at: now,
                updated_at: now,
            })
        });

        let service = AdminManager::new(Arc::new(repo));
        let admin = service
            .create_admin(NewAdminAccount {
                email: "Root@Choir.test".to_string(),
                password: "admin-password-1".to_string(),
                full_name: " Root ".to_string(),
                role: Role::SuperAdmin,
                choir_id: None,
            })
            .await
            .unwrap();

        assert_eq!(admin.email, "root@choir.test");
        assert_eq!(admin.full_name, "Root");
    }
}
