//! Image uploads and the object storage behind them.
//!
//! Uploads are spooled to a temporary file under the configured upload
//! directory, forwarded to object storage, and the temporary file is removed
//! whatever the outcome.

mod http;
mod image;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use common::{AppError, AppResult};

pub use http::HttpObjectStorage;
pub use image::{check_image, ImageKind};

#[cfg(test)]
use mockall::automock;

/// Destination for uploaded files.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Push the file at `path` under `object_name` and return its public URL
    async fn store(&self, path: &Path, object_name: &str, content_type: &str) -> AppResult<String>;
}

pub struct ImageUploader {
    storage: Arc<dyn ObjectStorage>,
    spool_dir: PathBuf,
}

impl ImageUploader {
    pub fn new(storage: Arc<dyn ObjectStorage>, spool_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage,
            spool_dir: spool_dir.into(),
        }
    }

    /// Validate and store an image, returning the URL it is served from.
    pub async fn upload(&self, content_type: Option<&str>, bytes: &[u8]) -> AppResult<String> {
        let kind = check_image(content_type, bytes)?;

        tokio::fs::create_dir_all(&self.spool_dir)
            .await
            .map_err(|e| AppError::internal(format!("Upload directory unavailable: {}", e)))?;
        let spooled = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(&format!(".{}", kind.extension()))
            .tempfile_in(&self.spool_dir)
            .map_err(|e| AppError::internal(format!("Failed to spool upload: {}", e)))?;
        tokio::fs::write(spooled.path(), bytes)
            .await
            .map_err(|e| AppError::internal(format!("Failed to spool upload: {}", e)))?;

        let object_name = format!("{}.{}", Uuid::new_v4(), kind.extension());
        let stored = self
            .storage
            .store(spooled.path(), &object_name, kind.content_type())
            .await;

        if let Err(e) = spooled.close() {
            tracing::warn!(error = %e, "Failed to remove spooled upload");
        }

        match &stored {
            Ok(url) => tracing::info!(object = %object_name, url = %url, "Image uploaded"),
            Err(e) => tracing::warn!(object = %object_name, error = %e, "Image upload failed"),
        }
        stored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];

    fn spooled_files(dir: &Path) -> usize {
        std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
    }

    #[tokio::test]
    async fn stores_image_and_removes_spool_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = MockObjectStorage::new();
        storage
            .expect_store()
            .withf(|path, name, content_type| {
                path.exists() && name.ends_with(".png") && content_type.starts_with("image/png")
            })
            .times(1)
            .returning(|_, name, _| Ok(format!("https://cdn.choir.test/{}", name)));

        let uploader = ImageUploader::new(Arc::new(storage), dir.path());
        let url = uploader.upload(Some("image/png"), PNG).await.unwrap();

        assert!(url.starts_with("https://cdn.choir.test/"));
        assert_eq!(spooled_files(dir.path()), 0);
    }

    #[tokio::test]
    async fn spool_file_is_removed_when_storage_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = MockObjectStorage::new();
        storage
            .expect_store()
            .times(1)
            .returning(|_, _, _| Err(AppError::storage("bucket offline")));

        let uploader = ImageUploader::new(Arc::new(storage), dir.path());
        let result = uploader.upload(Some("image/png"), PNG).await;

        assert!(matches!(result, Err(AppError::Storage(_))));
        assert_eq!(spooled_files(dir.path()), 0);
    }

    #[tokio::test]
    async fn invalid_image_never_reaches_storage() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = MockObjectStorage::new();
        storage.expect_store().never();

        let uploader = ImageUploader::new(Arc::new(storage), dir.path());
        let result = uploader.upload(Some("application/pdf"), b"%PDF-1.7").await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(spooled_files(dir.path()), 0);
    }

    #[tokio::test]
    async fn spool_directory_is_created_on_demand() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("spool").join("images");
        let mut storage = MockObjectStorage::new();
        storage
            .expect_store()
            .returning(|_, _, _| Ok("https://cdn.choir.test/a.png".to_string()));

        let uploader = ImageUploader::new(Arc::new(storage), &nested);
        tokio_test::assert_ok!(uploader.upload(Some("image/png"), PNG).await);

        assert!(nested.is_dir());
        assert_eq!(spooled_files(&nested), 0);
    }
}
