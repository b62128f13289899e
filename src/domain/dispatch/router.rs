//! Event router
//!
//! Turns a mention, direct message or interactive callback into at most one action call:
//! 1. Filters events the bot must not act on
//! 2. Checks the message is addressed to the bot
//! 3. Resolves the command token and runs its action
//! 4. Acknowledges with a reaction, or reports the failure to the audit channel

use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info, instrument, warn};

use super::action::{ActionTable, Invocation};
use super::command::Command;
use super::error::DispatchError;
use crate::domain::slack::{OutgoingMessage, SlackHandle};
use crate::domain::webhook::dto::{InteractionPayload, MessageEvent, SlackEvent};

/// Reaction added when an action succeeds
pub const SUCCESS_REACTION: &str = "white_check_mark";
/// Reaction added when processing fails
pub const FAILURE_REACTION: &str = "x";
/// `action_id` of the team selection dropdown
pub const SELECT_TEAM_ACTION_ID: &str = "select_team_action";

/// Why an event was dropped without dispatching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Mention outside the allow-listed channels
    ChannelNotAllowed,
    /// `message` event that is not a direct message
    NotDirectMessage,
    /// Message written by a bot, including this one
    OwnMessage,
    /// First word is not a mention of the bot
    NotAddressed,
    /// Event or interactive action type the bot does not handle
    Unsupported,
}

/// Result of routing a single event
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Skipped(SkipReason),
    Dispatched(Command),
    TeamSelected,
    Failed(DispatchError),
}

/// Static routing settings
#[derive(Debug, Clone)]
pub struct RouterSettings {
    /// The bot's own user id, resolved with `auth.test`
    pub bot_user_id: String,
    pub audit_channel: String,
    pub allowed_channels: Vec<String>,
}

pub struct EventRouter {
    slack: SlackHandle,
    actions: ActionTable,
    settings: RouterSettings,
}

impl EventRouter {
    pub fn new(slack: SlackHandle, actions: ActionTable, settings: RouterSettings) -> Self {
        Self {
            slack,
            actions,
            settings,
        }
    }

    /// Route an `event_callback` event
    pub async fn handle_event(&self, event: &SlackEvent) -> Outcome {
        match event {
            SlackEvent::AppMention(mention) => self.handle_mention(mention).await,
            SlackEvent::Message(message) => self.handle_direct_message(message).await,
            SlackEvent::Unsupported => {
                debug!("Ignoring unsupported event type");
                Outcome::Skipped(SkipReason::Unsupported)
            }
        }
    }

    #[instrument(skip(self, event), fields(channel = %event.channel, user = %event.user_id()))]
    pub async fn handle_mention(&self, event: &MessageEvent) -> Outcome {
        if !self
            .settings
            .allowed_channels
            .iter()
            .any(|c| c == &event.channel)
        {
            debug!("Mention outside allowed channels");
            return Outcome::Skipped(SkipReason::ChannelNotAllowed);
        }

        self.process_message(event).await
    }

    #[instrument(skip(self, event), fields(channel = %event.channel, user = %event.user_id()))]
    pub async fn handle_direct_message(&self, event: &MessageEvent) -> Outcome {
        if !event.is_direct_message() {
            return Outcome::Skipped(SkipReason::NotDirectMessage);
        }

        let from_self = event.user.as_deref() == Some(self.settings.bot_user_id.as_str());
        if from_self || event.bot_id.is_some() || event.subtype.is_some() {
            debug!("Ignoring bot-authored or non-plain message");
            return Outcome::Skipped(SkipReason::OwnMessage);
        }

        self.process_message(event).await
    }

    /// Shared path for mentions and direct messages once the event is eligible
    async fn process_message(&self, event: &MessageEvent) -> Outcome {
        let arguments: Vec<String> = event.text.split(' ').map(String::from).collect();

        let addressed = arguments
            .first()
            .and_then(|first| extract_user_id(first))
            .is_some_and(|id| id == self.settings.bot_user_id);
        if !addressed {
            debug!("Message not addressed to the bot");
            return Outcome::Skipped(SkipReason::NotAddressed);
        }

        let user_id = event.user_id().to_string();
        let token = arguments.get(1).map(String::as_str).unwrap_or_default();

        let command = match token.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                warn!(token, "Invalid command");
                self.report_failure(&user_id, &err).await;
                self.react(&event.channel, &event.ts, FAILURE_REACTION).await;
                return Outcome::Failed(err);
            }
        };

        let invocation = Invocation {
            arguments,
            user_id,
            channel_id: event.channel.clone(),
        };

        match self.dispatch(command, &invocation, &event.ts).await {
            Ok(()) => {
                info!(command = %command, "Action completed");
                Outcome::Dispatched(command)
            }
            Err(err) => {
                warn!(command = %command, error = %err, "Action failed");
                self.report_failure(&invocation.user_id, &err).await;
                self.react(&event.channel, &event.ts, FAILURE_REACTION).await;
                Outcome::Failed(err)
            }
        }
    }

    /// Run the action and add the success reaction
    async fn dispatch(
        &self,
        command: Command,
        invocation: &Invocation,
        ts: &str,
    ) -> Result<(), DispatchError> {
        self.actions
            .handler(command)
            .run(self.slack.as_ref(), invocation)
            .await?;

        self.slack
            .add_reaction(&invocation.channel_id, ts, SUCCESS_REACTION)
            .await
            .map_err(DispatchError::Acknowledge)
    }

    /// Route an interactive component callback
    #[instrument(skip(self, payload), fields(user = %payload.user.id))]
    pub async fn handle_interaction(&self, payload: &InteractionPayload) -> Outcome {
        let user_id = payload.user.id.as_str();

        let Some(action) = payload.first_action() else {
            debug!("Interaction without actions");
            return Outcome::Skipped(SkipReason::Unsupported);
        };
        if action.action_id != SELECT_TEAM_ACTION_ID {
            debug!(action_id = %action.action_id, "Ignoring interactive action");
            return Outcome::Skipped(SkipReason::Unsupported);
        }

        let result = match &action.selected_option {
            Some(option) => self
                .actions
                .select_team
                .run(self.slack.as_ref(), &option.value, user_id)
                .await
                .map_err(DispatchError::from),
            None => Err(DispatchError::MalformedPayload(
                "select_team_action without selected_option".to_string(),
            )),
        };

        match result {
            Ok(()) => {
                info!("Team selected");
                Outcome::TeamSelected
            }
            Err(err) => {
                warn!(error = %err, "Interactive action failed");
                self.report_failure(user_id, &err).await;
                Outcome::Failed(err)
            }
        }
    }

    /// Post a diagnostic message to the audit channel
    ///
    /// Errors are logged and swallowed so one event can never take the process down.
    pub async fn report_failure(&self, user_id: &str, err: &DispatchError) {
        let message = OutgoingMessage::text(&self.settings.audit_channel, err.audit_text(user_id));
        if let Err(e) = self.slack.post_message(message).await {
            warn!(error = %e, "Failed to post audit message");
        }
    }

    async fn react(&self, channel: &str, ts: &str, name: &str) {
        if let Err(e) = self.slack.add_reaction(channel, ts, name).await {
            warn!(error = %e, reaction = name, "Failed to add reaction");
        }
    }
}

/// Extract the user id from a mention token such as `<@U024BE7LH>` or `<@U024BE7LH|alice>`
pub fn extract_user_id(token: &str) -> Option<&str> {
    static MENTION: OnceLock<Regex> = OnceLock::new();
    let re = MENTION.get_or_init(|| {
        Regex::new(r"^<@([A-Z0-9]+)(?:\|[^>]*)?>$").expect("mention pattern is valid")
    });
    re.captures(token)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
