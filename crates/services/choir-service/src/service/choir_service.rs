//! Choir (tenant) management.

use std::sync::Arc;

use async_trait::async_trait;

use crate::repository::ChoirRepository;
use common::{AppError, AppResult, OptionExt};
use domain::{ensure_not_blank, Choir, ChoirChanges, NewChoir};

#[async_trait]
pub trait ChoirService: Send + Sync {
    async fn list_choirs(&self) -> AppResult<Vec<Choir>>;

    async fn get_choir(&self, id: i32) -> AppResult<Choir>;

    async fn create_choir(&self, choir: NewChoir) -> AppResult<Choir>;

    async fn update_choir(&self, id: i32, changes: ChoirChanges) -> AppResult<Choir>;

    async fn delete_choir(&self, id: i32) -> AppResult<()>;
}

pub struct ChoirManager {
    repo: Arc<dyn ChoirRepository>,
}

impl ChoirManager {
    pub fn new(repo: Arc<dyn ChoirRepository>) -> Self {
        Self { repo }
    }

    async fn ensure_name_free(&self, name: &str, current: Option<i32>) -> AppResult<()> {
        match self.repo.find_by_name(name).await? {
            Some(existing) if Some(existing.id) != current => Err(AppError::conflict("Choir")),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl ChoirService for ChoirManager {
    async fn list_choirs(&self) -> AppResult<Vec<Choir>> {
        self.repo.list().await
    }

    async fn get_choir(&self, id: i32) -> AppResult<Choir> {
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }

    async fn create_choir(&self, mut choir: NewChoir) -> AppResult<Choir> {
        choir.name = choir.name.trim().to_string();
        ensure_not_blank(&choir.name, "name")?;
        self.ensure_name_free(&choir.name, None).await?;

        let created = self.repo.create(choir).await?;
        tracing::info!(choir_id = created.id, "Choir created");
        Ok(created)
    }

    async fn update_choir(&self, id: i32, mut changes: ChoirChanges) -> AppResult<Choir> {
        if let Some(name) = changes.name.as_mut() {
            *name = name.trim().to_string();
            ensure_not_blank(name, "name")?;
            self.ensure_name_free(name, Some(id)).await?;
        }
        self.repo.update(id, changes).await
    }

    async fn delete_choir(&self, id: i32) -> AppResult<()> {
        self.repo.delete(id).await?;
        tracing::info!(choir_id = id, "Choir deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockChoirRepository;
    use chrono::Utc;

    fn choir(id: i32, name: &str) -> Choir {
        Choir {
            id,
            name: name.to_string(),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn duplicate_choir_name_conflicts() {
        let mut repo = MockChoirRepository::new();
        repo.expect_find_by_name()
            .withf(|name| name.to_string() == "Jubilate")
            .returning(|name| Ok(Some(choir(2, name))));
        repo.expect_create().never();

        let service = ChoirManager::new(Arc::new(repo));
        let result = service
            .create_choir(NewChoir {
                name: "  Jubilate ".to_string(),
                description: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn renaming_to_its_own_name_is_allowed() {
        let mut repo = MockChoirRepository::new();
        repo.expect_find_by_name()
            .returning(|name| Ok(Some(choir(2, name))));
        repo.expect_update()
            .times(1)
            .returning(|id, changes| Ok(choir(id, changes.name.as_deref().unwrap_or_default())));

        let service = ChoirManager::new(Arc::new(repo));
        let changes = ChoirChanges {
            name: Some("Jubilate".to_string()),
            ..Default::default()
        };

        let updated = service.update_choir(2, changes).await.unwrap();
        assert_eq!(updated.name, "Jubilate");
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let mut repo = MockChoirRepository::new();
        repo.expect_find_by_name().never();
        repo.expect_create().never();

        let service = ChoirManager::new(Arc::new(repo));
        let result = service
            .create_choir(NewChoir {
                name: " ".to_string(),
                description: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
