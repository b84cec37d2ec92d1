//! Member and admin account repositories.
//!
//! Members are never hard-deleted: deactivation flips `is_active` and a
//! deactivated member can be restored.

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::choir_condition;
use super::entities::admin_user::{self, Entity as AdminUserEntity};
use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use common::{AppError, AppResult, OptionExt};
use domain::{
    validate_status_change, AdminUser, Category, ChoirScope, MemberStatus, NewAdminUser, NewUser,
    Role, StatusReason, User, UserFilter, UserProfileChanges,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Member repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// List members inside `scope`, ordered by last then first name
    async fn list(&self, scope: ChoirScope, filter: UserFilter) -> AppResult<Vec<User>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Members among `ids`; unknown ids are skipped
    async fn find_many(&self, ids: Vec<i32>) -> AppResult<Vec<User>>;

    async fn create(&self, user: NewUser) -> AppResult<User>;

    async fn update_profile(&self, id: i32, changes: UserProfileChanges) -> AppResult<User>;

    /// Move a member through the lifecycle table. The member row is locked
    /// and the transition checked against its committed status.
    async fn update_status(
        &self,
        id: i32,
        status: MemberStatus,
        reason: StatusReason,
    ) -> AppResult<User>;

    async fn update_role(&self, id: i32, role: Role) -> AppResult<User>;

    async fn update_categories(&self, id: i32, categories: Vec<Category>) -> AppResult<User>;

    /// Deactivate (`false`) or restore (`true`) a member
    async fn set_active(&self, id: i32, is_active: bool) -> AppResult<User>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load(&self, id: i32) -> AppResult<ActiveModel> {
        let user = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found()?;
        Ok(user.into())
    }

    async fn save(&self, mut active: ActiveModel) -> AppResult<User> {
        active.updated_at = Set(chrono::Utc::now());
        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(User::from(model))
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn list(&self, scope: ChoirScope, filter: UserFilter) -> AppResult<Vec<User>> {
        let mut query = UserEntity::find().filter(choir_condition(user::Column::ChoirId, scope));

        if let Some(status) = filter.status {
            query = query.filter(user::Column::Status.eq(status));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(user::Column::IsActive.eq(is_active));
        }
        if let Some(category) = filter.category {
            query = query.filter(Expr::cust_with_values(
                "? = ANY(\"users\".\"categories\")",
                [category.as_str()],
            ));
        }

        let models = query
            .order_by_asc(user::Column::LastName)
            .order_by_asc(user::Column::FirstName)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_many(&self, ids: Vec<i32>) -> AppResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = UserEntity::find()
            .filter(user::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            choir_id: Set(user.choir_id),
            first_name: Set(user.first_name),
            last_name: Set(user.last_name),
            email: Set(user.email),
            phone_number: Set(user.phone_number),
            password_hash: Set(user.password_hash),
            gender: Set(user.gender),
            date_of_birth: Set(user.date_of_birth),
            address: Set(user.address),
            profile_image_url: Set(None),
            categories: Set(Category::to_tags(&user.categories)),
            role: Set(user.role),
            status: Set(None),
            status_reason: Set(None),
            is_active: Set(true),
            joined_at: Set(user.joined_at),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(User::from(model))
    }

    async fn update_profile(&self, id: i32, changes: UserProfileChanges) -> AppResult<User> {
        let mut active = self.load(id).await?;

        if let Some(choir_id) = changes.choir_id {
            active.choir_id = Set(Some(choir_id));
        }
        if let Some(first_name) = changes.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = changes.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(phone_number) = changes.phone_number {
            active.phone_number = Set(Some(phone_number));
        }
        if let Some(gender) = changes.gender {
            active.gender = Set(gender);
        }
        if let Some(date_of_birth) = changes.date_of_birth {
            active.date_of_birth = Set(Some(date_of_birth));
        }
        if let Some(address) = changes.address {
            active.address = Set(Some(address));
        }
        if let Some(url) = changes.profile_image_url {
            active.profile_image_url = Set(Some(url));
        }

        self.save(active).await
    }

    async fn update_status(
        &self,
        id: i32,
        status: MemberStatus,
        reason: StatusReason,
    ) -> AppResult<User> {
        let txn = self.db.begin().await?;

        let member = UserEntity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_not_found()?;
        validate_status_change(member.status, status, reason)?;

        let mut active: ActiveModel = member.into();
        active.status = Set(Some(status));
        active.status_reason = Set(Some(reason.as_str().to_string()));
        active.updated_at = Set(chrono::Utc::now());
        let model = active.update(&txn).await?;

        txn.commit().await?;
        Ok(User::from(model))
    }

    async fn update_role(&self, id: i32, role: Role) -> AppResult<User> {
        let mut active = self.load(id).await?;
        active.role = Set(role);
        self.save(active).await
    }

    async fn update_categories(&self, id: i32, categories: Vec<Category>) -> AppResult<User> {
        let mut active = self.load(id).await?;
        active.categories = Set(Category::to_tags(&categories));
        self.save(active).await
    }

    async fn set_active(&self, id: i32, is_active: bool) -> AppResult<User> {
        let mut active = self.load(id).await?;
        active.is_active = Set(is_active);
        self.save(active).await
    }
}

/// Admin account repository trait.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AdminUserRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<AdminUser>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<AdminUser>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<AdminUser>>;

    async fn create(&self, admin: NewAdminUser) -> AppResult<AdminUser>;

    async fn set_active(&self, id: i32, is_active: bool) -> AppResult<AdminUser>;
}

pub struct AdminUserStore {
    db: DatabaseConnection,
}

impl AdminUserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AdminUserRepository for AdminUserStore {
    async fn list(&self) -> AppResult<Vec<AdminUser>> {
        let models = AdminUserEntity::find()
            .order_by_asc(admin_user::Column::Email)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(AdminUser::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<AdminUser>> {
        let result = AdminUserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(AdminUser::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<AdminUser>> {
        let result = AdminUserEntity::find()
            .filter(admin_user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(AdminUser::from))
    }

    async fn create(&self, admin: NewAdminUser) -> AppResult<AdminUser> {
        let now = chrono::Utc::now();
        let active_model = admin_user::ActiveModel {
            email: Set(admin.email),
            password_hash: Set(admin.password_hash),
            full_name: Set(admin.full_name),
            role: Set(admin.role),
            choir_id: Set(admin.choir_id),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(AdminUser::from(model))
    }

    async fn set_active(&self, id: i32, is_active: bool) -> AppResult<AdminUser> {
        let admin = AdminUserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found()?;

        let mut active: admin_user::ActiveModel = admin.into();
        active.is_active = Set(is_active);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(AdminUser::from(model))
    }
}
