//! Shared HTTP client for the hosted backend.
//!
//! Every request carries the project's anonymous key in `apikey` and a bearer
//! token: the session's access token when one is attached, the anonymous key
//! otherwise. The record repositories and the storage backend build their
//! requests on [`BackendClient`].

use anyhow::{Context, Result};
use glimpse_core::models::Session;
use glimpse_core::Config;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

/// Failure of a single backend request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Failed to send request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse response as JSON: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status of a rejected request.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The backend's own error message when it sent one.
    pub fn message(&self) -> String {
        match self {
            ApiError::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Pull a human-readable message out of an error body.
///
/// The record service answers `{"message": ...}`, the storage service
/// `{"statusCode": ..., "error": ..., "message": ...}`.
fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error", "msg"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                if !text.is_empty() {
                    return text.to_string();
                }
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Unknown error".to_string()
    } else {
        trimmed.to_string()
    }
}

/// HTTP client for the hosted backend with project-key and session auth.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    anon_key: String,
    access_token: Option<String>,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.access_token.is_some())
            .finish()
    }
}

impl BackendClient {
    pub fn new(base_url: &str, anon_key: &str) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            access_token: None,
        })
    }

    /// Create a client from configuration, attaching the configured session
    /// when there is one.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Self::new(config.supabase_url(), config.supabase_anon_key())?;
        Ok(match config.session() {
            Some(session) => client.with_session(&session),
            None => client,
        })
    }

    /// A copy of this client that authenticates as the session's user.
    pub fn with_session(&self, session: &Session) -> Self {
        Self {
            access_token: Some(session.access_token.clone()),
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self.access_token.as_deref().unwrap_or(&self.anon_key);
        request
            .header("apikey", self.anon_key.as_str())
            .header("Authorization", format!("Bearer {}", token))
    }

    /// Start an authenticated request. Callers add query, headers and body.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.build_url(path);
        self.apply_auth(self.client.request(method, &url))
    }

    /// Send a request and turn non-success statuses into [`ApiError::Status`].
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: extract_error_message(&error_text),
            });
        }

        Ok(response)
    }

    /// Send a request and deserialize its JSON body.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// GET request with optional query parameters. Deserializes JSON response.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let mut request = self.request(Method::GET, path);
        if !query.is_empty() {
            request = request.query(query);
        }
        self.send_json(request).await
    }
}
