//! Configuration module
//!
//! Backend location, storage backend selection, bucket names and upload
//! limits, read from the environment (and `.env` through `dotenvy`).

use std::env;

use uuid::Uuid;

use crate::constants::{DEFAULT_AVATAR_BUCKET, DEFAULT_STORY_BUCKET, MAX_IMAGE_SIZE_MB};
use crate::models::Session;
use crate::storage_types::StorageBackend;

/// Application configuration.
#[derive(Clone)]
pub struct Config {
    supabase_url: String,
    supabase_anon_key: String,
    storage_backend: StorageBackend,
    local_storage_path: Option<String>,
    local_storage_base_url: Option<String>,
    story_bucket: String,
    avatar_bucket: String,
    max_image_size_mb: usize,
    cleanup_orphaned_uploads: bool,
    access_token: Option<String>,
    user_id: Option<Uuid>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("supabase_url", &self.supabase_url)
            .field("storage_backend", &self.storage_backend)
            .field("story_bucket", &self.story_bucket)
            .field("avatar_bucket", &self.avatar_bucket)
            .field("max_image_size_mb", &self.max_image_size_mb)
            .field("cleanup_orphaned_uploads", &self.cleanup_orphaned_uploads)
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup (the environment in
    /// production, a map in tests).
    pub fn from_vars<F>(var: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let supabase_url = var("SUPABASE_URL")
            .or_else(|| var("GLIMPSE_SUPABASE_URL"))
            .ok_or_else(|| anyhow::anyhow!("SUPABASE_URL must be set"))?;

        let supabase_anon_key = var("SUPABASE_ANON_KEY")
            .or_else(|| var("GLIMPSE_SUPABASE_ANON_KEY"))
            .ok_or_else(|| anyhow::anyhow!("SUPABASE_ANON_KEY must be set"))?;

        let storage_backend = match var("STORAGE_BACKEND") {
            Some(s) => s.parse::<StorageBackend>()?,
            None => StorageBackend::Supabase,
        };

        let max_image_size_mb = var("MAX_IMAGE_SIZE_MB")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(MAX_IMAGE_SIZE_MB);

        let user_id = match var("GLIMPSE_USER_ID").filter(|s| !s.is_empty()) {
            Some(s) => Some(
                Uuid::parse_str(&s)
                    .map_err(|_| anyhow::anyhow!("GLIMPSE_USER_ID must be a valid UUID"))?,
            ),
            None => None,
        };

        let config = Config {
            supabase_url: supabase_url.trim_end_matches('/').to_string(),
            supabase_anon_key,
            storage_backend,
            local_storage_path: var("LOCAL_STORAGE_PATH").filter(|s| !s.is_empty()),
            local_storage_base_url: var("LOCAL_STORAGE_BASE_URL").filter(|s| !s.is_empty()),
            story_bucket: var("STORY_BUCKET")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_STORY_BUCKET.to_string()),
            avatar_bucket: var("AVATAR_BUCKET")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_AVATAR_BUCKET.to_string()),
            max_image_size_mb,
            cleanup_orphaned_uploads: var("CLEANUP_ORPHANED_UPLOADS")
                .unwrap_or_else(|| "false".to_string())
                .to_lowercase()
                .parse()
                .unwrap_or(false),
            access_token: var("GLIMPSE_ACCESS_TOKEN").filter(|s| !s.is_empty()),
            user_id,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.supabase_url.starts_with("https://") || self.supabase_url.starts_with("http://"))
        {
            return Err(anyhow::anyhow!(
                "SUPABASE_URL must be an http(s) URL"
            ));
        }

        if self.supabase_anon_key.trim().is_empty() {
            return Err(anyhow::anyhow!("SUPABASE_ANON_KEY must not be empty"));
        }

        if self.max_image_size_mb == 0 {
            return Err(anyhow::anyhow!("MAX_IMAGE_SIZE_MB must be greater than 0"));
        }
        if self.max_image_size_mb.checked_mul(1024 * 1024).is_none() {
            return Err(anyhow::anyhow!("MAX_IMAGE_SIZE_MB is too large"));
        }

        if self.access_token.is_some() != self.user_id.is_some() {
            return Err(anyhow::anyhow!(
                "GLIMPSE_ACCESS_TOKEN and GLIMPSE_USER_ID must be set together"
            ));
        }

        match self.storage_backend {
            StorageBackend::Supabase => {}
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }

    pub fn supabase_url(&self) -> &str {
        &self.supabase_url
    }

    pub fn supabase_anon_key(&self) -> &str {
        &self.supabase_anon_key
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage_backend
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.local_storage_base_url.as_deref()
    }

    pub fn story_bucket(&self) -> &str {
        &self.story_bucket
    }

    pub fn avatar_bucket(&self) -> &str {
        &self.avatar_bucket
    }

    pub fn max_image_size_bytes(&self) -> usize {
        self.max_image_size_mb.saturating_mul(1024 * 1024)
    }

    pub fn cleanup_orphaned_uploads(&self) -> bool {
        self.cleanup_orphaned_uploads
    }

    /// The configured session, when both token and user id are present.
    pub fn session(&self) -> Option<Session> {
        match (&self.access_token, self.user_id) {
            (Some(token), Some(user_id)) => Some(Session::new(user_id, token.clone())),
            _ => None,
        }
    }
}
