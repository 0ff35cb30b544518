//! The stories strip: feed, create-story dialog and viewer wired together.

use glimpse_core::models::{FeedStory, Session, Story};
use glimpse_core::AppError;
use uuid::Uuid;

use crate::capture::CaptureFlow;
use crate::feed::FeedLoader;
use crate::viewer::{StoryView, StoryViewer};

pub struct StoryBoard {
    feed: FeedLoader,
    stories: Vec<FeedStory>,
    viewer: StoryViewer,
}

impl StoryBoard {
    pub fn new(feed: FeedLoader) -> Self {
        Self {
            feed,
            stories: Vec::new(),
            viewer: StoryViewer::new(),
        }
    }

    /// Initial load.
    pub async fn mount(&mut self) -> &[FeedStory] {
        self.refresh().await
    }

    /// Full reload of the feed. A failed fetch leaves the board empty.
    pub async fn refresh(&mut self) -> &[FeedStory] {
        self.stories = self.feed.load().await;
        &self.stories
    }

    pub fn stories(&self) -> &[FeedStory] {
        &self.stories
    }

    /// Submit the dialog's story; the feed is reloaded only on success.
    pub async fn submit(
        &mut self,
        flow: &mut CaptureFlow,
        session: Option<&Session>,
    ) -> Result<Story, AppError> {
        let story = flow.submit(session).await?;
        flow.close();
        self.refresh().await;
        Ok(story)
    }

    /// Open the viewer on a loaded story.
    pub fn open(&mut self, story_id: Uuid) -> Option<&StoryView> {
        let story = self.stories.iter().find(|s| s.id == story_id)?;
        Some(self.viewer.open(story))
    }

    pub fn close_viewer(&mut self) {
        self.viewer.close();
    }

    pub fn viewer(&self) -> &StoryViewer {
        &self.viewer
    }
}
