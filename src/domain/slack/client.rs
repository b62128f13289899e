use std::sync::Arc;

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error, instrument};

use super::dto::{ApiResponse, OutgoingMessage, ReactionRequest};
use crate::utils::AppError;

/// Messaging client interface
///
/// Abstracts the Slack Web API so the router and actions can be tested against a mock.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SlackApi: Send + Sync {
    /// `chat.postMessage`
    async fn post_message(&self, message: OutgoingMessage) -> Result<(), AppError>;

    /// `reactions.add`
    async fn add_reaction(
        &self,
        channel: &str,
        timestamp: &str,
        name: &str,
    ) -> Result<(), AppError>;

    /// `auth.test`, returning the bot's own user id
    async fn auth_test(&self) -> Result<String, AppError>;
}

/// Shared messaging client handle
pub type SlackHandle = Arc<dyn SlackApi>;

/// Slack Web API client
#[derive(Debug, Clone)]
pub struct SlackClient {
    client: Client,
    token: String,
    api_base: String,
}

impl SlackClient {
    pub fn new(token: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            token: token.into(),
            api_base: api_base.into(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.api_base, method)
    }

    /// POST a JSON body to a Web API method and check the `ok` flag
    async fn call<T: Serialize + ?Sized>(
        &self,
        method: &str,
        body: &T,
    ) -> Result<ApiResponse, AppError> {
        let response = self
            .client
            .post(self.method_url(method))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(method, error = %e, "Failed to reach Slack Web API");
                AppError::SlackApi(format!("{}: {}", method, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(method, status = %status, body = %body, "Slack Web API returned error status");
            return Err(AppError::SlackApi(format!("{}: HTTP {}", method, status)));
        }

        let parsed: ApiResponse = response.json().await?;
        if !parsed.ok {
            error!(method, error = parsed.error_code(), "Slack Web API call failed");
            return Err(AppError::SlackApi(format!(
                "{}: {}",
                method,
                parsed.error_code()
            )));
        }

        debug!(method, "Slack Web API call succeeded");
        Ok(parsed)
    }
}

#[async_trait::async_trait]
impl SlackApi for SlackClient {
    #[instrument(skip(self, message), fields(channel = %message.channel))]
    async fn post_message(&self, message: OutgoingMessage) -> Result<(), AppError> {
        self.call("chat.postMessage", &message).await.map(|_| ())
    }

    #[instrument(skip(self))]
    async fn add_reaction(
        &self,
        channel: &str,
        timestamp: &str,
        name: &str,
    ) -> Result<(), AppError> {
        let body = ReactionRequest {
            channel,
            timestamp,
            name,
        };
        self.call("reactions.add", &body).await.map(|_| ())
    }

    async fn auth_test(&self) -> Result<String, AppError> {
        let response = self.call("auth.test", &serde_json::json!({})).await?;
        response
            .user_id
            .ok_or_else(|| AppError::SlackApi("auth.test: missing user_id".to_string()))
    }
}
