//! Client for the upstream evaluation service.
//!
//! Every call returns the raw JSON body; shaping it into records is the
//! normalizer's job. No retries and no timeout beyond reqwest's defaults.

use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Upstream request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Upstream returned status {status}")]
    Status { status: u16, message: Option<String> },
}

impl UpstreamError {
    /// The `message` field of an upstream error body, if it had one.
    pub fn upstream_message(&self) -> Option<&str> {
        match self {
            UpstreamError::Status { message, .. } => message.as_deref(),
            UpstreamError::Request(_) => None,
        }
    }
}

/// Body sent to the upstream `/auth` endpoint.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub email: String,
    pub name: String,
    pub roll_no: String,
    pub access_code: String,
    #[serde(rename = "clientID")]
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for AuthPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthPayload")
            .field("email", &self.email)
            .field("roll_no", &self.roll_no)
            .field("access_code", &"<redacted>")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct UpstreamClient {
    http: Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub async fn authenticate(&self, payload: &AuthPayload) -> Result<Value, UpstreamError> {
        let request = self.http.post(self.url("/auth")).json(payload);
        self.send(request).await
    }

    pub async fn users(&self, token: &str) -> Result<Value, UpstreamError> {
        self.get("/users", token).await
    }

    pub async fn user_posts(&self, token: &str, user_id: u64) -> Result<Value, UpstreamError> {
        self.get(&format!("/users/{user_id}/posts"), token).await
    }

    pub async fn post_comments(&self, token: &str, post_id: u64) -> Result<Value, UpstreamError> {
        self.get(&format!("/posts/{post_id}/comments"), token).await
    }

    async fn get(&self, path: &str, token: &str) -> Result<Value, UpstreamError> {
        let request = self.http.get(self.url(path)).bearer_auth(token);
        self.send(request).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, UpstreamError> {
        let response = request.send().await?;
        read_success(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn read_success(response: Response) -> Result<Value, UpstreamError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    // Error bodies are optional and not always JSON.
    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_owned));

    Err(UpstreamError::Status {
        status: status.as_u16(),
        message,
    })
}
