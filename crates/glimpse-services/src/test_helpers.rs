//! Test doubles for storage and the camera.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use glimpse_core::models::Session;
use glimpse_core::AppError;
use glimpse_storage::{Storage, StorageBackend, StorageError, StorageResult, UploadOptions};

use crate::capture::{CameraDevice, CameraStream, Frame};

#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub bucket: String,
    pub path: String,
    pub options: UploadOptions,
}

/// In-memory storage that records every call.
#[derive(Clone, Default)]
pub struct RecordingStorage {
    buckets: Arc<Mutex<HashSet<String>>>,
    objects: Arc<Mutex<HashMap<(String, String), Bytes>>>,
    uploads: Arc<Mutex<Vec<RecordedUpload>>>,
    calls: Arc<AtomicUsize>,
    omit_paths: Arc<AtomicBool>,
    next_upload_error: Arc<Mutex<Option<StorageError>>>,
    session_tokens: Arc<Mutex<Vec<String>>>,
}

impl RecordingStorage {
    pub fn with_buckets(buckets: &[&str]) -> Self {
        let storage = Self::default();
        storage
            .buckets
            .lock()
            .unwrap()
            .extend(buckets.iter().map(|b| b.to_string()));
        storage
    }

    /// Total number of calls of any kind.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_upload(&self) -> Option<RecordedUpload> {
        self.uploads.lock().unwrap().last().cloned()
    }

    pub fn contains(&self, bucket: &str, path: &str) -> bool {
        self.objects
            .lock()
            .unwrap()
            .contains_key(&(bucket.to_string(), path.to_string()))
    }

    pub fn put(&self, bucket: &str, path: &str) {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), path.to_string()), Bytes::new());
    }

    /// Accept uploads without reporting the stored path.
    pub fn omit_paths(&self, omit: bool) {
        self.omit_paths.store(omit, Ordering::SeqCst);
    }

    /// Access tokens of the sessions the storage was scoped to, in order.
    pub fn session_tokens(&self) -> Vec<String> {
        self.session_tokens.lock().unwrap().clone()
    }

    pub fn fail_next_upload(&self, error: StorageError) {
        *self.next_upload_error.lock().unwrap() = Some(error);
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Storage for RecordingStorage {
    fn for_session(&self, session: &Session) -> Arc<dyn Storage> {
        self.session_tokens
            .lock()
            .unwrap()
            .push(session.access_token.clone());
        Arc::new(self.clone())
    }

    async fn bucket_exists(&self, bucket: &str) -> StorageResult<bool> {
        self.record_call();
        Ok(self.buckets.lock().unwrap().contains(bucket))
    }

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        options: &UploadOptions,
    ) -> StorageResult<Option<String>> {
        self.record_call();
        if let Some(error) = self.next_upload_error.lock().unwrap().take() {
            return Err(error);
        }
        self.uploads.lock().unwrap().push(RecordedUpload {
            bucket: bucket.to_string(),
            path: path.to_string(),
            options: options.clone(),
        });
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), path.to_string()), data);

        if self.omit_paths.load(Ordering::SeqCst) {
            Ok(None)
        } else {
            Ok(Some(path.to_string()))
        }
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> StorageResult<()> {
        self.record_call();
        let mut objects = self.objects.lock().unwrap();
        for path in paths {
            objects.remove(&(bucket.to_string(), path.clone()));
        }
        Ok(())
    }

    async fn exists(&self, bucket: &str, path: &str) -> StorageResult<bool> {
        self.record_call();
        Ok(self.contains(bucket, path))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }

    fn public_url_prefix(&self, bucket: &str) -> String {
        format!("https://storage.test/{}/", bucket)
    }
}

/// Camera that counts acquisitions and releases.
#[derive(Clone, Default)]
pub struct CountingCamera {
    acquired: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
    deny: Arc<AtomicBool>,
}

impl CountingCamera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deny_access(&self, deny: bool) {
        self.deny.store(deny, Ordering::SeqCst);
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Streams currently open.
    pub fn active(&self) -> usize {
        self.acquired() - self.released()
    }
}

#[async_trait]
impl CameraDevice for CountingCamera {
    async fn acquire(&self) -> Result<Box<dyn CameraStream>, AppError> {
        if self.deny.load(Ordering::SeqCst) {
            return Err(AppError::Camera("NotAllowedError: permission denied".to_string()));
        }
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(CountingStream {
            released: self.released.clone(),
        }))
    }
}

struct CountingStream {
    released: Arc<AtomicUsize>,
}

impl CameraStream for CountingStream {
    fn snapshot(&mut self) -> Result<Frame, AppError> {
        Ok(Frame::from_pixel(8, 8, image::Rgb([30, 120, 200])))
    }

    fn release(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}
