use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use glimpse_core::models::{NewStory, Profile, ProfileUpdate, Session, Story, StoryWithProfile};
use glimpse_core::AppError;
use uuid::Uuid;

/// Story records.
#[async_trait]
pub trait StoryRepository: Send + Sync {
    /// The same repository acting as the session's user.
    fn for_session(&self, session: &Session) -> Arc<dyn StoryRepository>;

    /// Insert a story. The store assigns its id and creation timestamp.
    ///
    /// Fails with [`AppError::Persist`].
    async fn insert(&self, story: &NewStory) -> Result<Story, AppError>;

    /// Stories created strictly after `since`, joined with their owner's
    /// display fields, newest first.
    ///
    /// Fails with [`AppError::Fetch`].
    async fn list_since(&self, since: DateTime<Utc>) -> Result<Vec<StoryWithProfile>, AppError>;
}

/// Profile records.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// The same repository acting as the session's user.
    fn for_session(&self, session: &Session) -> Arc<dyn ProfileRepository>;

    async fn get(&self, id: Uuid) -> Result<Option<Profile>, AppError>;

    /// Overwrite the editable fields of a profile and return the stored row.
    async fn update(&self, id: Uuid, update: &ProfileUpdate) -> Result<Profile, AppError>;
}
