//! Shared setup for the service integration tests.

pub mod camera;

use std::sync::Arc;

use glimpse_storage::{LocalStorage, Storage};
use tempfile::TempDir;

pub const FILES_BASE_URL: &str = "http://localhost:8080/files";

/// Filesystem storage under a fresh temporary directory with `buckets`
/// created. Keep the directory alive for the duration of the test.
pub async fn local_storage(buckets: &[&str]) -> (TempDir, Arc<dyn Storage>) {
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalStorage::new(dir.path(), FILES_BASE_URL.to_string())
        .await
        .unwrap();
    for bucket in buckets {
        storage.create_bucket(bucket).await.unwrap();
    }
    (dir, Arc::new(storage))
}
