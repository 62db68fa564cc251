//! Object storage client for artwork uploads.
//!
//! Quote submissions may attach artwork files; each file is uploaded to
//! the hosted backend's object storage before the quote record is created.
//! Stored paths are namespaced by folder and disambiguated with a
//! timestamp plus a random suffix to avoid collisions.

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use rand::distr::Alphanumeric;
use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::instrument;

use crate::config::DataStoreConfig;

/// Errors that can occur when interacting with object storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Storage returned an error response.
    #[error("storage error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// Client for the hosted object storage.
#[derive(Clone)]
pub struct StorageClient {
    inner: Arc<StorageClientInner>,
}

struct StorageClientInner {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
    api_key: String,
}

impl StorageClient {
    /// Create a new object storage client.
    #[must_use]
    pub fn new(config: &DataStoreConfig) -> Self {
        Self {
            inner: Arc::new(StorageClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_url.trim_end_matches('/').to_string(),
                bucket: config.artwork_bucket.clone(),
                api_key: config.api_key.expose_secret().to_string(),
            }),
        }
    }

    /// Upload a file into `folder`, returning the stored object path.
    ///
    /// The original file name only contributes its extension; the stored
    /// name is `{folder}/{millis}-{random}.{ext}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload request fails or is rejected.
    #[instrument(skip(self, bytes), fields(file_name = %file_name, size = bytes.len()))]
    pub async fn upload(
        &self,
        folder: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        let object_path = object_path(folder, file_name);
        let url = format!(
            "{}/storage/v1/object/{}/{object_path}",
            self.inner.base_url, self.inner.bucket
        );

        let response = self
            .inner
            .client
            .post(&url)
            .header("apikey", &self.inner.api_key)
            .header("Authorization", format!("Bearer {}", self.inner.api_key))
            .header("cache-control", "3600")
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                path = %object_path,
                body = %message.chars().take(200).collect::<String>(),
                "artwork upload rejected"
            );
            return Err(StorageError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(object_path)
    }

    /// Public URL for a stored object path.
    #[must_use]
    pub fn public_url(&self, object_path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{object_path}",
            self.inner.base_url, self.inner.bucket
        )
    }
}

/// Build a collision-resistant stored path for an uploaded file.
fn object_path(folder: &str, file_name: &str) -> String {
    let suffix: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(10)
        .map(char::from)
        .collect::<String>()
        .to_lowercase();

    let millis = Utc::now().timestamp_millis();

    match file_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => format!("{folder}/{millis}-{suffix}.{ext}"),
        _ => format!("{folder}/{millis}-{suffix}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_path_keeps_extension_only() {
        let path = object_path("uploads", "my artwork.final.pdf");
        assert!(path.starts_with("uploads/"));
        assert!(path.ends_with(".pdf"));
        assert!(!path.contains("artwork"));
    }

    #[test]
    fn test_object_path_without_extension() {
        let path = object_path("uploads", "README");
        assert!(path.starts_with("uploads/"));
        assert!(!path.ends_with('.'));
    }

    #[test]
    fn test_object_paths_are_distinct() {
        let a = object_path("uploads", "a.png");
        let b = object_path("uploads", "a.png");
        assert_ne!(a, b);
    }
}
