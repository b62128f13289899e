//! DTOs for Slack webhook payloads
//!
//! Contains data structures for:
//! - The Events API envelope (`url_verification`, `event_callback`)
//! - Message and mention events
//! - Interactive component callbacks

use serde::{Deserialize, Serialize};

// ============================================================================
// Events API
// ============================================================================

/// Outer body of every `POST /slack/events` request
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventEnvelope {
    /// Handshake sent when the request URL is configured
    UrlVerification { challenge: String },
    /// A subscribed event happened
    EventCallback { event: SlackEvent },
    /// `app_rate_limited` and anything Slack adds later
    #[serde(other)]
    Other,
}

/// Inner event of an `event_callback`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SlackEvent {
    AppMention(MessageEvent),
    Message(MessageEvent),
    #[serde(other)]
    Unsupported,
}

/// Fields shared by `app_mention` and `message` events
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MessageEvent {
    pub channel: String,
    pub ts: String,
    pub user: Option<String>,
    pub text: String,
    /// `im` for direct messages
    pub channel_type: Option<String>,
    /// Set when a bot (including this one) authored the message
    pub bot_id: Option<String>,
    /// Edits, joins and other non-plain messages
    pub subtype: Option<String>,
}

impl MessageEvent {
    pub fn is_direct_message(&self) -> bool {
        self.channel_type.as_deref() == Some("im")
    }

    pub fn user_id(&self) -> &str {
        self.user.as_deref().unwrap_or("unknown")
    }
}

/// Reply to the verification handshake
#[derive(Debug, Clone, Serialize)]
pub struct ChallengeResponse {
    pub challenge: String,
}

// ============================================================================
// Interactivity
// ============================================================================

/// Form body of `POST /slack/events/interactivity`
#[derive(Debug, Clone, Deserialize)]
pub struct InteractivityForm {
    /// JSON-encoded [`InteractionPayload`]
    pub payload: String,
}

/// Block action callback
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionPayload {
    pub user: InteractionUser,
    #[serde(default)]
    pub actions: Vec<BlockAction>,
}

impl InteractionPayload {
    /// The first action of the payload; Slack only ever sends one for block actions
    pub fn first_action(&self) -> Option<&BlockAction> {
        self.actions.first()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractionUser {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlockAction {
    pub action_id: String,
    #[serde(default)]
    pub selected_option: Option<SelectedOption>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectedOption {
    pub value: String,
}
