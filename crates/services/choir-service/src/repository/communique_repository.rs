//! Communique repository.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use super::choir_condition;
use super::entities::communique::{self, ActiveModel, Entity as CommuniqueEntity};
use common::{AppError, AppResult, OptionExt};
use domain::{Category, ChoirScope, Communique, CommuniqueChanges, NewCommunique};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CommuniqueRepository: Send + Sync {
    /// Every communique in `scope`, drafts included, newest first
    async fn list(&self, scope: ChoirScope) -> AppResult<Vec<Communique>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Communique>>;

    async fn create(&self, communique: NewCommunique) -> AppResult<Communique>;

    async fn update(&self, id: i32, changes: CommuniqueChanges) -> AppResult<Communique>;

    /// Stamp `published_at`; publishing twice keeps the first timestamp
    async fn publish(&self, id: i32) -> AppResult<Communique>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct CommuniqueStore {
    db: DatabaseConnection,
}

impl CommuniqueStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load(&self, id: i32) -> AppResult<communique::Model> {
        CommuniqueEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found()
    }
}

#[async_trait]
impl CommuniqueRepository for CommuniqueStore {
    async fn list(&self, scope: ChoirScope) -> AppResult<Vec<Communique>> {
        let models = CommuniqueEntity::find()
            .filter(choir_condition(communique::Column::ChoirId, scope))
            .order_by_desc(communique::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Communique::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Communique>> {
        let result = CommuniqueEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Communique::from))
    }

    async fn create(&self, communique: NewCommunique) -> AppResult<Communique> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            choir_id: Set(communique.choir_id),
            title: Set(communique.title),
            content: Set(communique.content),
            target_categories: Set(Category::to_tags(&communique.target_categories)),
            published_at: Set(communique.publish.then_some(now)),
            author_id: Set(communique.author_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Communique::from(model))
    }

    async fn update(&self, id: i32, changes: CommuniqueChanges) -> AppResult<Communique> {
        let mut active: ActiveModel = self.load(id).await?.into();

        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(content) = changes.content {
            active.content = Set(content);
        }
        if let Some(categories) = changes.target_categories {
            active.target_categories = Set(Category::to_tags(&categories));
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Communique::from(model))
    }

    async fn publish(&self, id: i32) -> AppResult<Communique> {
        let existing = self.load(id).await?;
        if existing.published_at.is_some() {
            return Ok(Communique::from(existing));
        }

        let now = chrono::Utc::now();
        let mut active: ActiveModel = existing.into();
        active.published_at = Set(Some(now));
        active.updated_at = Set(now);

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Communique::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = CommuniqueEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
