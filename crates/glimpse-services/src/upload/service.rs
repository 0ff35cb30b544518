//! Image upload pipeline: validate → check bucket → store → resolve URL.

use std::sync::Arc;

use glimpse_core::constants::UPLOAD_CACHE_CONTROL_SECS;
use glimpse_core::models::{ImageFile, Session};
use glimpse_core::validation::validate_image_file;
use glimpse_core::AppError;
use glimpse_storage::{Storage, StorageError, UploadOptions};

use super::types::{UploadTarget, UploadedImage};

pub const NO_PATH_RETURNED_MESSAGE: &str = "Upload failed - no path returned";
const NO_PUBLIC_URL_MESSAGE: &str = "Could not get public URL for uploaded file";

/// Uploads user images to object storage.
#[derive(Clone)]
pub struct ImageUploader {
    storage: Arc<dyn Storage>,
    max_size_bytes: usize,
}

impl ImageUploader {
    pub fn new(storage: Arc<dyn Storage>, max_size_bytes: usize) -> Self {
        Self {
            storage,
            max_size_bytes,
        }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// An uploader whose storage calls act as the session's user.
    pub fn for_session(&self, session: &Session) -> Self {
        Self::new(self.storage.for_session(session), self.max_size_bytes)
    }

    /// Upload an image and return its public URL.
    ///
    /// Size and type are checked before the store is contacted. A missing
    /// bucket is reported as [`AppError::StorageUnavailable`]; a store that
    /// accepts the upload without reporting a path yields
    /// [`AppError::Upload`], never an empty URL.
    pub async fn upload(
        &self,
        file: &ImageFile,
        target: &UploadTarget,
    ) -> Result<UploadedImage, AppError> {
        validate_image_file(file, self.max_size_bytes)?;

        match self.storage.bucket_exists(&target.bucket).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::error!(bucket = %target.bucket, "Upload bucket not found");
                return Err(AppError::StorageUnavailable(
                    target.bucket_missing_message().to_string(),
                ));
            }
            Err(e) => {
                tracing::error!(bucket = %target.bucket, error = %e, "Upload bucket lookup failed");
                return Err(AppError::StorageUnavailable(
                    target.bucket_missing_message().to_string(),
                ));
            }
        }

        let path = target.object_path(&file.extension());
        let options = UploadOptions::new(file.content_type.clone())
            .with_cache_control(UPLOAD_CACHE_CONTROL_SECS)
            .with_upsert(target.upsert);

        let stored = self
            .storage
            .upload(&target.bucket, &path, file.data.clone(), &options)
            .await
            .map_err(|e| {
                tracing::error!(bucket = %target.bucket, key = %path, error = %e, "Upload error");
                match e {
                    StorageError::BucketNotFound(_) => AppError::StorageUnavailable(
                        target.service_unavailable_message().to_string(),
                    ),
                    StorageError::UploadFailed(msg) => AppError::Upload(msg),
                    other => AppError::Upload(other.to_string()),
                }
            })?;

        let stored = stored
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::Upload(NO_PATH_RETURNED_MESSAGE.to_string()))?;

        let url = self
            .storage
            .public_url(&target.bucket, &stored)
            .ok()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| AppError::Upload(NO_PUBLIC_URL_MESSAGE.to_string()))?;

        tracing::info!(
            bucket = %target.bucket,
            key = %stored,
            size_bytes = file.size(),
            url = %url,
            "Image uploaded"
        );

        Ok(UploadedImage {
            bucket: target.bucket.clone(),
            path: stored,
            url,
        })
    }

    /// Delete an uploaded image, logging instead of failing.
    pub async fn discard(&self, image: &UploadedImage) {
        match self
            .storage
            .remove(&image.bucket, std::slice::from_ref(&image.path))
            .await
        {
            Ok(()) => {
                tracing::info!(bucket = %image.bucket, key = %image.path, "Orphaned upload removed")
            }
            Err(e) => tracing::warn!(
                bucket = %image.bucket,
                key = %image.path,
                error = %e,
                "Failed to remove orphaned upload"
            ),
        }
    }
}
