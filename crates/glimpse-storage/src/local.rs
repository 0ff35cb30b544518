use crate::keys;
use crate::traits::{Storage, StorageError, StorageResult, UploadOptions};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use glimpse_core::models::Session;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
///
/// Each bucket is a directory directly under `base_path`; buckets are not
/// created implicitly by uploads, matching the hosted service.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory holding one directory per bucket
    /// * `base_url` - Base URL the directory is served from (e.g., "http://localhost:8080/files")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Create a bucket directory if it does not exist yet.
    pub async fn create_bucket(&self, bucket: &str) -> StorageResult<()> {
        let path = self.bucket_path(bucket)?;
        fs::create_dir_all(&path).await?;
        tracing::info!(bucket = %bucket, path = %path.display(), "Local bucket created");
        Ok(())
    }

    fn bucket_path(&self, bucket: &str) -> StorageResult<PathBuf> {
        if bucket.is_empty() || bucket.contains('/') || bucket.contains("..") {
            return Err(StorageError::InvalidKey(format!(
                "Invalid bucket name: {}",
                bucket
            )));
        }
        Ok(self.base_path.join(bucket))
    }

    /// Convert bucket and object path to a filesystem path with security validation
    ///
    /// Rejects paths containing traversal sequences that could escape the
    /// bucket directory.
    fn key_to_path(&self, bucket: &str, storage_key: &str) -> StorageResult<PathBuf> {
        keys::validate_key(storage_key)?;
        let bucket_path = self.bucket_path(bucket)?;
        let path = bucket_path.join(storage_key);

        if path.strip_prefix(&bucket_path).is_err() {
            return Err(StorageError::InvalidKey(
                "Storage key resolves outside storage directory".to_string(),
            ));
        }

        Ok(path)
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    fn for_session(&self, _session: &Session) -> Arc<dyn Storage> {
        Arc::new(self.clone())
    }

    async fn bucket_exists(&self, bucket: &str) -> StorageResult<bool> {
        let path = self.bucket_path(bucket)?;
        Ok(fs::metadata(&path)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false))
    }

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        options: &UploadOptions,
    ) -> StorageResult<Option<String>> {
        if !self.bucket_exists(bucket).await? {
            return Err(StorageError::BucketNotFound(bucket.to_string()));
        }

        let file_path = self.key_to_path(bucket, path)?;
        let size = data.len();

        if !options.upsert && fs::try_exists(&file_path).await.unwrap_or(false) {
            return Err(StorageError::UploadFailed(
                "The resource already exists".to_string(),
            ));
        }

        self.ensure_parent_dir(&file_path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&file_path).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to create file {}: {}",
                file_path.display(),
                e
            ))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to write file {}: {}",
                file_path.display(),
                e
            ))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to sync file {}: {}",
                file_path.display(),
                e
            ))
        })?;

        tracing::info!(
            path = %file_path.display(),
            bucket = %bucket,
            key = %path,
            content_type = %options.content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(Some(path.to_string()))
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> StorageResult<()> {
        for key in paths {
            let path = self.key_to_path(bucket, key)?;

            if !fs::try_exists(&path).await.unwrap_or(false) {
                continue;
            }

            fs::remove_file(&path).await.map_err(|e| {
                StorageError::DeleteFailed(format!(
                    "Failed to delete file {}: {}",
                    path.display(),
                    e
                ))
            })?;

            tracing::info!(
                path = %path.display(),
                bucket = %bucket,
                key = %key,
                "Local storage delete successful"
            );
        }

        Ok(())
    }

    async fn exists(&self, bucket: &str, path: &str) -> StorageResult<bool> {
        let path = self.key_to_path(bucket, path)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }

    fn public_url_prefix(&self, bucket: &str) -> String {
        format!("{}/{}/", self.base_url.trim_end_matches('/'), bucket)
    }
}
