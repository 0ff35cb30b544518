use async_trait::async_trait;
use glimpse_api_client::BackendClient;
use glimpse_core::models::{Profile, ProfileUpdate, Session};
use glimpse_core::AppError;
use reqwest::Method;
use std::sync::Arc;
use uuid::Uuid;

use super::{table_path, RETURN_REPRESENTATION};
use crate::repository::ProfileRepository;

const PROFILES_TABLE: &str = "profiles";

/// Repository for profile records
#[derive(Clone, Debug)]
pub struct RestProfileRepository {
    client: BackendClient,
}

impl RestProfileRepository {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProfileRepository for RestProfileRepository {
    fn for_session(&self, session: &Session) -> Arc<dyn ProfileRepository> {
        Arc::new(Self::new(self.client.with_session(session)))
    }

    #[tracing::instrument(skip(self), fields(db.table = "profiles", db.operation = "select", db.record_id = %id))]
    async fn get(&self, id: Uuid) -> Result<Option<Profile>, AppError> {
        let query = [("select", "*".to_string()), ("id", format!("eq.{}", id))];

        let rows: Vec<Profile> = self
            .client
            .get_json(&table_path(PROFILES_TABLE), &query)
            .await
            .map_err(|e| AppError::Fetch(e.message()))?;

        Ok(rows.into_iter().next())
    }

    #[tracing::instrument(skip(self, update), fields(db.table = "profiles", db.operation = "update", db.record_id = %id))]
    async fn update(&self, id: Uuid, update: &ProfileUpdate) -> Result<Profile, AppError> {
        let request = self
            .client
            .request(Method::PATCH, &table_path(PROFILES_TABLE))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", RETURN_REPRESENTATION)
            .json(update);

        let rows: Vec<Profile> = self
            .client
            .send_json(request)
            .await
            .map_err(|e| AppError::Persist(e.message()))?;

        rows.into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
    }
}
