//! Slack Web API request and response bodies

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `chat.postMessage` body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingMessage {
    /// Channel id, or a user id to open a direct message
    pub channel: String,
    /// Plain text, also used as the notification fallback when blocks are present
    pub text: String,
    /// Block Kit layout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Value>,
}

impl OutgoingMessage {
    pub fn text(channel: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            text: text.into(),
            blocks: None,
        }
    }

    pub fn with_blocks(mut self, blocks: Value) -> Self {
        self.blocks = Some(blocks);
        self
    }
}

/// `reactions.add` body
#[derive(Debug, Clone, Serialize)]
pub struct ReactionRequest<'a> {
    pub channel: &'a str,
    pub timestamp: &'a str,
    pub name: &'a str,
}

/// Envelope every Web API method answers with
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    /// Present on `auth.test`
    #[serde(default)]
    pub user_id: Option<String>,
}

impl ApiResponse {
    pub fn error_code(&self) -> &str {
        self.error.as_deref().unwrap_or("unknown_error")
    }
}
