#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-supabase")]
use crate::SupabaseStorage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
#[cfg(feature = "storage-supabase")]
use glimpse_api_client::BackendClient;
use glimpse_core::Config;
use std::sync::Arc;

/// Create a storage backend based on configuration
///
/// The hosted backend shares the caller's [`BackendClient`] so uploads are
/// made as the signed-in user.
#[cfg(feature = "storage-supabase")]
pub async fn create_storage(
    config: &Config,
    client: &BackendClient,
) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend() {
        StorageBackend::Supabase => Ok(Arc::new(SupabaseStorage::new(client.clone()))),
        StorageBackend::Local => create_local(config).await,
    }
}

/// Create a storage backend based on configuration
#[cfg(not(feature = "storage-supabase"))]
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend() {
        StorageBackend::Supabase => Err(StorageError::ConfigError(
            "Supabase storage backend not available (storage-supabase feature not enabled)"
                .to_string(),
        )),
        StorageBackend::Local => create_local(config).await,
    }
}

#[cfg(feature = "storage-local")]
async fn create_local(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let base_path = config
        .local_storage_path()
        .map(String::from)
        .ok_or_else(|| StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string()))?;
    let base_url = config
        .local_storage_base_url()
        .map(String::from)
        .ok_or_else(|| {
            StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
        })?;

    let storage = LocalStorage::new(base_path, base_url).await?;
    // Buckets are provisioned out of band on the hosted service; locally the
    // configured ones are created up front.
    storage.create_bucket(config.story_bucket()).await?;
    storage.create_bucket(config.avatar_bucket()).await?;
    Ok(Arc::new(storage))
}

#[cfg(not(feature = "storage-local"))]
async fn create_local(_config: &Config) -> StorageResult<Arc<dyn Storage>> {
    Err(StorageError::ConfigError(
        "Local storage backend not available (storage-local feature not enabled)".to_string(),
    ))
}
