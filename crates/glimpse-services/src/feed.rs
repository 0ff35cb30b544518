//! Stories of the last 24 hours.

use std::sync::Arc;

use glimpse_core::constants::story_visibility_window;
use glimpse_core::models::FeedStory;
use glimpse_core::{AppError, Clock};
use glimpse_db::StoryRepository;

/// Loads the visible stories, newest first.
#[derive(Clone)]
pub struct FeedLoader {
    stories: Arc<dyn StoryRepository>,
    clock: Arc<dyn Clock>,
}

impl FeedLoader {
    pub fn new(stories: Arc<dyn StoryRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { stories, clock }
    }

    /// Stories created strictly less than 24 hours before now.
    ///
    /// Expired stories are never deleted; they simply stop matching.
    pub async fn try_load(&self) -> Result<Vec<FeedStory>, AppError> {
        let now = self.clock.now();
        let since = now - story_visibility_window();

        let mut rows = self.stories.list_since(since).await?;
        rows.retain(|row| row.created_at > since);
        // Stable, so the store's order is kept for equal timestamps.
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        tracing::debug!(count = rows.len(), since = %since, "Feed loaded");
        Ok(rows.into_iter().map(FeedStory::from).collect())
    }

    /// Like [`FeedLoader::try_load`], but a failed fetch is logged and
    /// yields an empty feed.
    pub async fn load(&self) -> Vec<FeedStory> {
        match self.try_load().await {
            Ok(stories) => stories,
            Err(e) => {
                tracing::error!(code = "FETCH_ERROR", error = %e, "Error fetching stories");
                Vec::new()
            }
        }
    }
}
