use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use glimpse_api_client::BackendClient;
use glimpse_core::models::{NewStory, Session, Story, StoryWithProfile};
use glimpse_core::AppError;
use reqwest::Method;
use std::sync::Arc;

use super::{table_path, RETURN_REPRESENTATION};
use crate::repository::StoryRepository;

const STORIES_TABLE: &str = "stories";
const FEED_VIEW: &str = "stories_with_profiles";

/// Repository for story records
#[derive(Clone, Debug)]
pub struct RestStoryRepository {
    client: BackendClient,
}

impl RestStoryRepository {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StoryRepository for RestStoryRepository {
    fn for_session(&self, session: &Session) -> Arc<dyn StoryRepository> {
        Arc::new(Self::new(self.client.with_session(session)))
    }

    #[tracing::instrument(skip(self), fields(db.table = "stories", db.operation = "insert"))]
    async fn insert(&self, story: &NewStory) -> Result<Story, AppError> {
        let request = self
            .client
            .request(Method::POST, &table_path(STORIES_TABLE))
            .header("Prefer", RETURN_REPRESENTATION)
            .json(story);

        let rows: Vec<Story> = self
            .client
            .send_json(request)
            .await
            .map_err(|e| AppError::Persist(e.message()))?;

        let created = rows
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Persist("Story insert returned no row".to_string()))?;

        tracing::info!(story_id = %created.id, user_id = %created.user_id, "Story created");
        Ok(created)
    }

    #[tracing::instrument(skip(self), fields(db.table = "stories_with_profiles", db.operation = "select"))]
    async fn list_since(&self, since: DateTime<Utc>) -> Result<Vec<StoryWithProfile>, AppError> {
        let query = [
            ("select", "*".to_string()),
            (
                "created_at",
                format!("gt.{}", since.to_rfc3339_opts(SecondsFormat::Millis, true)),
            ),
            ("order", "created_at.desc".to_string()),
        ];

        let rows: Vec<StoryWithProfile> = self
            .client
            .get_json(&table_path(FEED_VIEW), &query)
            .await
            .map_err(|e| AppError::Fetch(e.message()))?;

        tracing::debug!(count = rows.len(), "Stories fetched");
        Ok(rows)
    }
}
