//! Access token refreshers.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct RefreshedTokens {
    pub token: String,
    pub refresh_token: Option<String>,
}

/// Exchanges a refresh token for a new access token.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshedTokens>;
}

/// Calls `POST auth/refresh-token` with `{ refreshToken }`.
#[derive(Debug, Clone)]
pub struct HttpTokenRefresher {
    client: Client,
    endpoint: String,
}

impl HttpTokenRefresher {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    token: String,
    refresh_token: Option<String>,
}

#[async_trait]
impl TokenRefresher for HttpTokenRefresher {
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshedTokens> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "refreshToken": refresh_token }))
            .send()
            .await
            .context("Failed to send refresh token request")?
            .error_for_status()
            .context("Refresh token request failed")?
            .json::<RefreshResponse>()
            .await
            .context("Failed to parse refresh token response")?;

        Ok(RefreshedTokens {
            token: response.token,
            refresh_token: response.refresh_token,
        })
    }
}
