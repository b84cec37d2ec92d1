//! Choir (tenant) repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::choir::{self, ActiveModel, Entity as ChoirEntity};
use common::{AppError, AppResult, OptionExt};
use domain::{Choir, ChoirChanges, NewChoir};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ChoirRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Choir>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Choir>>;

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Choir>>;

    async fn create(&self, choir: NewChoir) -> AppResult<Choir>;

    async fn update(&self, id: i32, changes: ChoirChanges) -> AppResult<Choir>;

    /// Members of a deleted choir keep their rows with `choir_id` cleared.
    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct ChoirStore {
    db: DatabaseConnection,
}

impl ChoirStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ChoirRepository for ChoirStore {
    async fn list(&self) -> AppResult<Vec<Choir>> {
        let models = ChoirEntity::find()
            .order_by_asc(choir::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Choir::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Choir>> {
        let result = ChoirEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Choir::from))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Choir>> {
        let result = ChoirEntity::find()
            .filter(choir::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Choir::from))
    }

    async fn create(&self, choir: NewChoir) -> AppResult<Choir> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            name: Set(choir.name),
            description: Set(choir.description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Choir::from(model))
    }

    async fn update(&self, id: i32, changes: ChoirChanges) -> AppResult<Choir> {
        let choir = ChoirEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found()?;

        let mut active: ActiveModel = choir.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Choir::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = ChoirEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
