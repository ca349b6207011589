//! HTTP client for the redlight game API.
//!
//! DESIGN
//! ======
//! `GameApi` is the seam between the watch loop and the network so the
//! toggle/poll logic can be tested against a recording mock. The production
//! impl is a thin reqwest wrapper. Deliberately absent: request timeouts,
//! retries, and backoff — every failure is surfaced once and the caller
//! decides whether to log and carry on.

use async_trait::async_trait;
use protocol::{GameState, Mode, SetModeBody};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned HTTP {status} for {path}")]
    Status { status: u16, path: &'static str },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Operations the watch loop performs against the server.
#[async_trait]
pub trait GameApi: Send + Sync {
    async fn gamestate(&self) -> Result<GameState, ApiError>;
    async fn set_mode(&self, mode: Mode) -> Result<(), ApiError>;
    async fn start(&self) -> Result<(), ApiError>;
    async fn restart(&self) -> Result<(), ApiError>;
    async fn penalty(&self) -> Result<(), ApiError>;
    async fn ping(&self) -> Result<(), ApiError>;
}

/// reqwest-backed production client.
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post_empty(&self, path: &'static str) -> Result<(), ApiError> {
        let response = self.client.post(self.url(path)).send().await?;
        check_status(&response, path)
    }
}

fn check_status(response: &reqwest::Response, path: &'static str) -> Result<(), ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(ApiError::Status { status: status.as_u16(), path })
    }
}

#[async_trait]
impl GameApi for HttpApi {
    async fn gamestate(&self) -> Result<GameState, ApiError> {
        let path = "/api/gamestate";
        let response = self.client.get(self.url(path)).send().await?;
        check_status(&response, path)?;
        Ok(response.json::<GameState>().await?)
    }

    async fn set_mode(&self, mode: Mode) -> Result<(), ApiError> {
        let path = "/api/setmode";
        let response = self
            .client
            .post(self.url(path))
            .json(&SetModeBody { mode })
            .send()
            .await?;
        check_status(&response, path)
    }

    async fn start(&self) -> Result<(), ApiError> {
        self.post_empty("/api/start").await
    }

    async fn restart(&self) -> Result<(), ApiError> {
        self.post_empty("/api/restart").await
    }

    async fn penalty(&self) -> Result<(), ApiError> {
        self.post_empty("/api/penalty").await
    }

    async fn ping(&self) -> Result<(), ApiError> {
        let path = "/healthz";
        let response = self.client.get(self.url(path)).send().await?;
        check_status(&response, path)
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
