//! Application state for dependency injection.

use std::sync::Arc;

use async_trait::async_trait;

use choir_service_lib::infra::Database;
use choir_service_lib::ServiceContainer;
use common::{AppError, AppResult};

use crate::storage::ImageUploader;

/// Dependency probed by `GET /health`.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn check(&self) -> AppResult<()>;
}

#[async_trait]
impl HealthProbe for Database {
    async fn check(&self) -> AppResult<()> {
        self.ping().await.map_err(AppError::from)
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<dyn ServiceContainer>,
    pub uploader: Arc<ImageUploader>,
    pub database: Arc<dyn HealthProbe>,
}

impl AppState {
    pub fn new(
        services: Arc<dyn ServiceContainer>,
        uploader: Arc<ImageUploader>,
        database: Arc<dyn HealthProbe>,
    ) -> Self {
        Self {
            services,
            uploader,
            database,
        }
    }
}
