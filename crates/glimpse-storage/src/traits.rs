//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::keys;
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use glimpse_core::models::Session;
use std::sync::Arc;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Per-upload settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    pub content_type: String,
    /// `cache-control` max-age in seconds.
    pub cache_control_secs: Option<u32>,
    /// Overwrite an existing object at the same path instead of failing.
    pub upsert: bool,
}

impl UploadOptions {
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            cache_control_secs: None,
            upsert: false,
        }
    }

    pub fn with_cache_control(mut self, secs: u32) -> Self {
        self.cache_control_secs = Some(secs);
        self
    }

    pub fn with_upsert(mut self, upsert: bool) -> Self {
        self.upsert = upsert;
        self
    }
}

/// Storage abstraction trait
///
/// All storage backends (hosted storage service, local filesystem) implement
/// this trait so the upload flow never couples to one of them.
#[async_trait]
pub trait Storage: Send + Sync {
    /// The same backend acting as the session's user.
    fn for_session(&self, session: &Session) -> Arc<dyn Storage>;

    /// Check whether a bucket exists.
    async fn bucket_exists(&self, bucket: &str) -> StorageResult<bool>;

    /// Upload an object.
    ///
    /// Returns the path the backend stored the object under, or `None` when
    /// the backend accepted the upload without reporting one.
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        options: &UploadOptions,
    ) -> StorageResult<Option<String>>;

    /// Delete objects. Paths that do not exist are ignored.
    async fn remove(&self, bucket: &str, paths: &[String]) -> StorageResult<()>;

    /// Check if an object exists
    async fn exists(&self, bucket: &str, path: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;

    /// Public URL prefix of a bucket; an object's URL is this prefix
    /// followed by its encoded path.
    fn public_url_prefix(&self, bucket: &str) -> String;

    /// Publicly reachable URL for a stored object.
    fn public_url(&self, bucket: &str, path: &str) -> StorageResult<String> {
        keys::validate_key(path)?;
        Ok(format!(
            "{}{}",
            self.public_url_prefix(bucket),
            keys::encode_path(path)
        ))
    }

    /// Inverse of [`Storage::public_url`]: the object path behind a public
    /// URL of this bucket, or `None` if the URL points elsewhere.
    fn object_path_from_url(&self, bucket: &str, url: &str) -> Option<String> {
        let prefix = self.public_url_prefix(bucket);
        let encoded = url.strip_prefix(&prefix)?;
        let path = keys::decode_path(encoded)?;
        keys::validate_key(&path).ok()?;
        Some(path)
    }
}
