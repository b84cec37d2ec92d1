//! Object storage reached over HTTP multipart.

use std::path::Path;

use async_trait::async_trait;
use reqwest::{multipart, Client};
use serde::Deserialize;

use common::{AppError, AppResult, StorageConfig};

use super::ObjectStorage;

/// Posts files to an upload endpoint that answers `{"url": "..."}`.
pub struct HttpObjectStorage {
    client: Client,
    upload_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StoredObject {
    url: String,
}

impl HttpObjectStorage {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            client: Client::new(),
            upload_url: config.upload_url.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl ObjectStorage for HttpObjectStorage {
    async fn store(&self, path: &Path, object_name: &str, content_type: &str) -> AppResult<String> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::internal(format!("Failed to read spooled upload: {}", e)))?;

        let part = multipart::Part::bytes(bytes)
            .file_name(object_name.to_string())
            .mime_str(content_type)
            .map_err(|e| AppError::storage(e.to_string()))?;
        let form = multipart::Form::new()
            .text("name", object_name.to_string())
            .part("file", part);

        let mut request = self.client.post(&self.upload_url).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::storage(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::storage(format!(
                "upload of {} rejected with status {}",
                object_name, status
            )));
        }

        let stored: StoredObject = response
            .json()
            .await
            .map_err(|e| AppError::storage(format!("unreadable storage response: {}", e)))?;
        tracing::debug!(object = %object_name, url = %stored.url, "Object stored");
        Ok(stored.url)
    }
}
