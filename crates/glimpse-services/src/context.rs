//! Wiring of backend client, storage and repositories from configuration.

use std::sync::Arc;

use anyhow::Context;
use glimpse_api_client::BackendClient;
use glimpse_core::{Clock, Config, SystemClock};
use glimpse_db::{ProfileRepository, RestProfileRepository, RestStoryRepository, StoryRepository};
use glimpse_storage::{create_storage, Storage};

use crate::board::StoryBoard;
use crate::capture::{CameraDevice, CaptureFlow, StoryPublisher};
use crate::feed::FeedLoader;
use crate::profile::ProfileEditor;
use crate::upload::ImageUploader;

/// Shared dependencies of every flow.
#[derive(Clone)]
pub struct ServiceContext {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub stories: Arc<dyn StoryRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub clock: Arc<dyn Clock>,
}

impl ServiceContext {
    /// Connect to the configured backend.
    pub async fn from_config(config: Config) -> anyhow::Result<Self> {
        let client = BackendClient::from_config(&config)?;
        let storage = create_storage(&config, &client)
            .await
            .context("Failed to initialize storage backend")?;

        tracing::info!(
            backend = %storage.backend_type(),
            story_bucket = %config.story_bucket(),
            avatar_bucket = %config.avatar_bucket(),
            "Services initialized"
        );

        Ok(Self {
            storage,
            stories: Arc::new(RestStoryRepository::new(client.clone())),
            profiles: Arc::new(RestProfileRepository::new(client)),
            clock: Arc::new(SystemClock),
            config,
        })
    }

    pub fn uploader(&self) -> ImageUploader {
        ImageUploader::new(self.storage.clone(), self.config.max_image_size_bytes())
    }

    pub fn feed_loader(&self) -> FeedLoader {
        FeedLoader::new(self.stories.clone(), self.clock.clone())
    }

    pub fn publisher(&self) -> StoryPublisher {
        StoryPublisher::new(
            self.uploader(),
            self.stories.clone(),
            self.config.story_bucket(),
        )
        .with_orphan_cleanup(self.config.cleanup_orphaned_uploads())
    }

    pub fn capture_flow(&self, camera: Arc<dyn CameraDevice>) -> CaptureFlow {
        CaptureFlow::new(self.publisher(), camera)
    }

    pub fn story_board(&self) -> StoryBoard {
        StoryBoard::new(self.feed_loader())
    }

    pub fn profile_editor(&self) -> ProfileEditor {
        ProfileEditor::new(
            self.profiles.clone(),
            self.uploader(),
            self.config.avatar_bucket(),
            self.clock.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::CountingCamera;
    use glimpse_core::models::Session;
    use glimpse_storage::StorageBackend;
    use std::collections::HashMap;
    use uuid::Uuid;

    #[tokio::test]
    async fn local_backend_context_publishes_camera_stories() {
        let dir = tempfile::tempdir().unwrap();
        let vars: HashMap<&str, String> = [
            ("SUPABASE_URL", "http://localhost:54321".to_string()),
            ("SUPABASE_ANON_KEY", "anon".to_string()),
            ("STORAGE_BACKEND", "local".to_string()),
            ("LOCAL_STORAGE_PATH", dir.path().display().to_string()),
            ("LOCAL_STORAGE_BASE_URL", "http://localhost:8080/files".to_string()),
        ]
        .into_iter()
        .collect();
        let config = Config::from_vars(|key| vars.get(key).cloned()).unwrap();

        let mut context = ServiceContext::from_config(config).await.unwrap();
        assert_eq!(context.storage.backend_type(), StorageBackend::Local);
        assert!(context.storage.bucket_exists("media").await.unwrap());
        assert!(context.storage.bucket_exists("avatars").await.unwrap());

        context.stories = Arc::new(glimpse_db::InMemoryStoryRepository::default());
        let camera = CountingCamera::new();
        let mut flow = context.capture_flow(Arc::new(camera.clone()));
        flow.start_camera().await.unwrap();
        flow.capture_photo().unwrap();
        assert_eq!(camera.active(), 0);

        let session = Session::new(Uuid::new_v4(), "jwt");
        let story = flow.submit(Some(&session)).await.unwrap();
        assert!(story
            .image_url
            .starts_with("http://localhost:8080/files/media/stories/"));
    }
}
