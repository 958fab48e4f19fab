use std::time::Duration;

use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

use crate::config::Config;
use crate::core::task::Task;

/// Errors surfaced by the task API client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport-level failure: DNS, connect, TLS, broken stream.
    #[error("network error: {0}")]
    Network(String),

    /// The bounded wait time elapsed before the server answered.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// The server answered, but the payload is missing what we need.
    #[error("{0}")]
    Protocol(String),

    /// An authenticated call was attempted without a token to send.
    #[error("no access token available")]
    Auth,
}

/// Client for the two remote operations: login and task listing.
///
/// Holds no credential state of its own — `login` returns the token and
/// the caller decides where it lives.
#[derive(Clone)]
pub struct ApiClient {
    login_url: String,
    tasks_url: String,
    api_auth: String,
    timeout_secs: u64,
    http: Client,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            login_url: config.login_url.clone(),
            tasks_url: config.tasks_url.clone(),
            api_auth: config.api_auth.clone(),
            timeout_secs: config.timeout_secs,
            http,
        })
    }

    /// POST the login request and extract `oauth.access_token` from the
    /// response body.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let body = serde_json::json!({
            "username": username,
            "password": password,
        });

        let resp = self
            .http
            .post(&self.login_url)
            .header(AUTHORIZATION, format!("Basic {}", self.api_auth))
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Protocol(format!("login returned {}", status)));
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| ApiError::Protocol(format!("unreadable login response: {}", e)))?;

        json["oauth"]["access_token"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ApiError::Protocol("access token not found in login response".into()))
    }

    /// GET the task listing with a Bearer token.
    ///
    /// Refuses to send an unauthenticated request: an empty token is
    /// `ApiError::Auth` before anything goes on the wire. Entries decode
    /// leniently, so one malformed record never discards the listing.
    pub async fn list_tasks(&self, token: &str) -> Result<Vec<Task>, ApiError> {
        if token.is_empty() {
            return Err(ApiError::Auth);
        }

        let resp = self
            .http
            .get(&self.tasks_url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Protocol(format!("task listing returned {}", status)));
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| ApiError::Protocol(format!("unreadable task listing: {}", e)))?;

        let entries = json
            .as_array()
            .ok_or_else(|| ApiError::Protocol("task listing is not a JSON array".into()))?;

        Ok(entries.iter().map(Task::from_json).collect())
    }

    fn transport_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout(self.timeout_secs)
        } else {
            ApiError::Network(e.to_string())
        }
    }
}
