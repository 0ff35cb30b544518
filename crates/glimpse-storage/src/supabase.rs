//! Hosted storage service backend.
//!
//! Talks to the `/storage/v1` REST surface of the backend project through the
//! shared [`BackendClient`], so requests carry the project key and the
//! session's bearer token.

use crate::keys;
use crate::traits::{Storage, StorageError, StorageResult, UploadOptions};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use glimpse_api_client::{ApiError, BackendClient};
use glimpse_core::models::Session;
use reqwest::Method;
use serde::Deserialize;
use std::sync::Arc;

const BUCKET_NOT_FOUND: &str = "Bucket not found";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(rename = "Key")]
    key: Option<String>,
}

/// Storage backed by the hosted storage service.
#[derive(Clone, Debug)]
pub struct SupabaseStorage {
    client: BackendClient,
}

impl SupabaseStorage {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    fn object_endpoint(bucket: &str, path: &str) -> String {
        format!("/storage/v1/object/{}/{}", bucket, keys::encode_path(path))
    }

    fn is_bucket_not_found(err: &ApiError) -> bool {
        err.message().eq_ignore_ascii_case(BUCKET_NOT_FOUND)
    }

    /// The stored path relative to the bucket, from the `Key` the service
    /// reports (`<bucket>/<path>`).
    fn path_from_key(bucket: &str, key: &str) -> Option<String> {
        let path = key
            .strip_prefix(bucket)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(key);
        if path.is_empty() {
            None
        } else {
            Some(path.to_string())
        }
    }
}

#[async_trait]
impl Storage for SupabaseStorage {
    fn for_session(&self, session: &Session) -> Arc<dyn Storage> {
        Arc::new(Self::new(self.client.with_session(session)))
    }

    #[tracing::instrument(skip(self), fields(storage.bucket = %bucket))]
    async fn bucket_exists(&self, bucket: &str) -> StorageResult<bool> {
        let request = self.client.request(
            Method::GET,
            &format!("/storage/v1/bucket/{}", urlencoding::encode(bucket)),
        );

        match self.client.send(request).await {
            Ok(_) => Ok(true),
            Err(err) if err.status() == Some(404) || Self::is_bucket_not_found(&err) => {
                tracing::warn!(bucket = %bucket, "Storage bucket does not exist");
                Ok(false)
            }
            Err(err) => Err(StorageError::BackendError(err.message())),
        }
    }

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        options: &UploadOptions,
    ) -> StorageResult<Option<String>> {
        keys::validate_key(path)?;

        let size = data.len();
        let start = std::time::Instant::now();

        let mut request = self
            .client
            .request(Method::POST, &Self::object_endpoint(bucket, path))
            .header("content-type", options.content_type.as_str())
            .header("x-upsert", if options.upsert { "true" } else { "false" });
        if let Some(secs) = options.cache_control_secs {
            request = request.header("cache-control", format!("max-age={}", secs));
        }

        let response: UploadResponse = self
            .client
            .send_json(request.body(data))
            .await
            .map_err(|err| {
                if Self::is_bucket_not_found(&err) {
                    StorageError::BucketNotFound(bucket.to_string())
                } else {
                    StorageError::UploadFailed(err.message())
                }
            })?;

        let stored = response
            .key
            .as_deref()
            .and_then(|key| Self::path_from_key(bucket, key));

        tracing::info!(
            bucket = %bucket,
            key = %path,
            content_type = %options.content_type,
            size_bytes = size,
            upsert = options.upsert,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Storage upload completed"
        );

        Ok(stored)
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> StorageResult<()> {
        if paths.is_empty() {
            return Ok(());
        }
        for path in paths {
            keys::validate_key(path)?;
        }

        let request = self
            .client
            .request(Method::DELETE, &format!("/storage/v1/object/{}", bucket))
            .json(&serde_json::json!({ "prefixes": paths }));

        self.client
            .send(request)
            .await
            .map_err(|err| StorageError::DeleteFailed(err.message()))?;

        tracing::info!(bucket = %bucket, count = paths.len(), "Storage objects removed");
        Ok(())
    }

    async fn exists(&self, bucket: &str, path: &str) -> StorageResult<bool> {
        keys::validate_key(path)?;
        let request = self
            .client
            .request(Method::HEAD, &Self::object_endpoint(bucket, path));

        match self.client.send(request).await {
            Ok(_) => Ok(true),
            Err(err) if matches!(err.status(), Some(400) | Some(404)) => Ok(false),
            Err(err) => Err(StorageError::BackendError(err.message())),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Supabase
    }

    fn public_url_prefix(&self, bucket: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/",
            self.client.base_url(),
            bucket
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    async fn storage_for(server: &mockito::ServerGuard) -> SupabaseStorage {
        SupabaseStorage::new(BackendClient::new(&server.url(), "anon-key").unwrap())
    }

    #[tokio::test]
    async fn bucket_lookup_distinguishes_missing_bucket() {
        let mut server = mockito::Server::new_async().await;
        let _present = server
            .mock("GET", "/storage/v1/bucket/media")
            .with_status(200)
            .with_body(r#"{"id":"media","name":"media","public":true}"#)
            .create_async()
            .await;
        let _missing = server
            .mock("GET", "/storage/v1/bucket/avatars")
            .with_status(400)
            .with_body(r#"{"statusCode":"404","error":"Bucket not found","message":"Bucket not found"}"#)
            .create_async()
            .await;

        let storage = storage_for(&server).await;
        assert!(storage.bucket_exists("media").await.unwrap());
        assert!(!storage.bucket_exists("avatars").await.unwrap());
    }

    #[tokio::test]
    async fn bucket_lookup_server_error_is_backend_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/storage/v1/bucket/media")
            .with_status(500)
            .with_body(r#"{"message":"internal"}"#)
            .create_async()
            .await;

        let storage = storage_for(&server).await;
        let err = storage.bucket_exists("media").await.unwrap_err();
        assert!(matches!(err, StorageError::BackendError(_)));
    }

    #[tokio::test]
    async fn upload_sends_headers_and_returns_relative_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/storage/v1/object/media/stories/abc.jpg")
            .match_header("content-type", "image/jpeg")
            .match_header("cache-control", "max-age=3600")
            .match_header("x-upsert", "false")
            .match_header("apikey", "anon-key")
            .match_body(Matcher::Exact("jpeg-bytes".to_string()))
            .with_status(200)
            .with_body(r#"{"Key":"media/stories/abc.jpg","Id":"1"}"#)
            .create_async()
            .await;

        let storage = storage_for(&server).await;
        let stored = storage
            .upload(
                "media",
                "stories/abc.jpg",
                Bytes::from_static(b"jpeg-bytes"),
                &UploadOptions::new("image/jpeg").with_cache_control(3600),
            )
            .await
            .unwrap();

        assert_eq!(stored.as_deref(), Some("stories/abc.jpg"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn upload_without_key_yields_no_path() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/storage/v1/object/avatars/me.png")
            .match_header("x-upsert", "true")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let storage = storage_for(&server).await;
        let stored = storage
            .upload(
                "avatars",
                "me.png",
                Bytes::from_static(b"png"),
                &UploadOptions::new("image/png").with_upsert(true),
            )
            .await
            .unwrap();

        assert_eq!(stored, None);
    }

    #[tokio::test]
    async fn upload_errors_are_classified() {
        let mut server = mockito::Server::new_async().await;
        let _missing = server
            .mock("POST", "/storage/v1/object/media/a.jpg")
            .with_status(400)
            .with_body(r#"{"error":"Bucket not found","message":"Bucket not found"}"#)
            .create_async()
            .await;
        let _denied = server
            .mock("POST", "/storage/v1/object/media/b.jpg")
            .with_status(403)
            .with_body(r#"{"message":"new row violates row-level security policy"}"#)
            .create_async()
            .await;

        let storage = storage_for(&server).await;
        let options = UploadOptions::new("image/jpeg");

        let err = storage
            .upload("media", "a.jpg", Bytes::from_static(b"x"), &options)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::BucketNotFound(_)));

        let err = storage
            .upload("media", "b.jpg", Bytes::from_static(b"x"), &options)
            .await
            .unwrap_err();
        match err {
            StorageError::UploadFailed(msg) => assert!(msg.contains("row-level security")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn remove_sends_prefixes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/storage/v1/object/avatars")
            .match_body(Matcher::Json(serde_json::json!({ "prefixes": ["old.png"] })))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let storage = storage_for(&server).await;
        storage
            .remove("avatars", &["old.png".to_string()])
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn exists_maps_missing_object_to_false() {
        let mut server = mockito::Server::new_async().await;
        let _found = server
            .mock("HEAD", "/storage/v1/object/media/stories/a.jpg")
            .with_status(200)
            .create_async()
            .await;
        let _missing = server
            .mock("HEAD", "/storage/v1/object/media/stories/b.jpg")
            .with_status(400)
            .create_async()
            .await;

        let storage = storage_for(&server).await;
        assert!(storage.exists("media", "stories/a.jpg").await.unwrap());
        assert!(!storage.exists("media", "stories/b.jpg").await.unwrap());
    }

    #[tokio::test]
    async fn public_urls_use_public_object_route() {
        let server = mockito::Server::new_async().await;
        let storage = storage_for(&server).await;

        let url = storage.public_url("media", "stories/abc.jpg").unwrap();
        assert_eq!(
            url,
            format!("{}/storage/v1/object/public/media/stories/abc.jpg", server.url())
        );
        assert_eq!(
            storage.object_path_from_url("media", &url).as_deref(),
            Some("stories/abc.jpg")
        );
    }

    #[tokio::test]
    async fn session_scoped_upload_sends_the_user_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/storage/v1/object/avatars/me.png")
            .match_header("apikey", "anon-key")
            .match_header("authorization", "Bearer user-jwt")
            .with_status(200)
            .with_body(r#"{"Key":"avatars/me.png"}"#)
            .create_async()
            .await;

        let session = Session::new(uuid::Uuid::new_v4(), "user-jwt");
        let storage = storage_for(&server).await.for_session(&session);
        let stored = storage
            .upload(
                "avatars",
                "me.png",
                Bytes::from_static(b"png"),
                &UploadOptions::new("image/png").with_upsert(true),
            )
            .await
            .unwrap();

        assert_eq!(stored.as_deref(), Some("me.png"));
        mock.assert_async().await;
    }
}
