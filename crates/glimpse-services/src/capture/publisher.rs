//! Story creation: upload the image, then write the story record.

use std::sync::Arc;

use glimpse_core::models::{ImageFile, NewStory, Session, Story};
use glimpse_core::validation::normalize_caption;
use glimpse_core::AppError;
use glimpse_db::StoryRepository;

use crate::upload::{ImageUploader, UploadTarget};

pub const STORY_CREATED_MESSAGE: &str = "Story created successfully!";

/// Creates stories for the signed-in user.
#[derive(Clone)]
pub struct StoryPublisher {
    uploader: ImageUploader,
    stories: Arc<dyn StoryRepository>,
    target: UploadTarget,
    cleanup_orphaned_uploads: bool,
}

impl StoryPublisher {
    pub fn new(
        uploader: ImageUploader,
        stories: Arc<dyn StoryRepository>,
        story_bucket: impl Into<String>,
    ) -> Self {
        Self {
            uploader,
            stories,
            target: UploadTarget::story(story_bucket),
            cleanup_orphaned_uploads: false,
        }
    }

    /// Delete the uploaded image when the story record cannot be written.
    pub fn with_orphan_cleanup(mut self, enabled: bool) -> Self {
        self.cleanup_orphaned_uploads = enabled;
        self
    }

    /// Upload `image` and record it as a story of the session's user.
    ///
    /// The caption is trimmed and capped; a blank caption is stored as none.
    /// Without cleanup enabled, an image whose record failed to persist
    /// stays in storage.
    pub async fn publish(
        &self,
        session: Option<&Session>,
        image: &ImageFile,
        caption: &str,
    ) -> Result<Story, AppError> {
        let session = session.ok_or(AppError::NotAuthenticated)?;
        let uploader = self.uploader.for_session(session);
        let stories = self.stories.for_session(session);

        let uploaded = uploader.upload(image, &self.target).await?;

        let new_story = NewStory {
            user_id: session.user_id,
            image_url: uploaded.url.clone(),
            caption: normalize_caption(caption),
        };

        match stories.insert(&new_story).await {
            Ok(story) => {
                tracing::info!(
                    story_id = %story.id,
                    user_id = %story.user_id,
                    has_caption = story.caption.is_some(),
                    "{}",
                    STORY_CREATED_MESSAGE
                );
                Ok(story)
            }
            Err(e) => {
                e.log("Story record could not be saved");
                if self.cleanup_orphaned_uploads {
                    uploader.discard(&uploaded).await;
                }
                if matches!(e, AppError::Persist(_)) {
                    Err(e)
                } else {
                    Err(AppError::Persist(e.to_string()))
                }
            }
        }
    }
}
