use std::sync::Arc;

use serde_json::{json, Value};
use tracing::info;

use super::{Ledger, Roster};
use crate::domain::dispatch::router::SELECT_TEAM_ACTION_ID;
use crate::domain::dispatch::{Action, InteractiveAction, Invocation};
use crate::domain::slack::{OutgoingMessage, SlackApi};
use crate::utils::AppError;

/// Slack caps static select menus at 100 options
const MAX_SELECT_OPTIONS: usize = 100;

/// `set-team [team]`
///
/// With a team name the caller joins it right away, otherwise a dropdown is posted
/// and the choice comes back through [`TeamSelectAction`].
pub struct SetTeamAction {
    ledger: Arc<Ledger>,
    roster: Roster,
}

impl SetTeamAction {
    pub fn new(ledger: Arc<Ledger>, roster: Roster) -> Self {
        Self { ledger, roster }
    }
}

#[async_trait::async_trait]
impl Action for SetTeamAction {
    async fn run(&self, slack: &dyn SlackApi, invocation: &Invocation) -> Result<(), AppError> {
        if self.roster.is_empty() {
            return Err(AppError::invalid_argument("No teams are configured"));
        }

        let requested: Vec<&str> = invocation
            .rest()
            .iter()
            .map(String::as_str)
            .filter(|w| !w.is_empty())
            .collect();

        let message = if requested.is_empty() {
            OutgoingMessage::text(&invocation.channel_id, "Pick your team")
                .with_blocks(team_picker(&self.roster))
        } else {
            let team = join_team(
                &self.ledger,
                &self.roster,
                &requested.join(" "),
                &invocation.user_id,
            )
            .await?;
            OutgoingMessage::text(
                &invocation.channel_id,
                format!("<@{}> joined team *{}*", invocation.user_id, team),
            )
        };

        slack.post_message(message).await
    }
}

/// Handles the dropdown posted by [`SetTeamAction`]
pub struct TeamSelectAction {
    ledger: Arc<Ledger>,
    roster: Roster,
}

impl TeamSelectAction {
    pub fn new(ledger: Arc<Ledger>, roster: Roster) -> Self {
        Self { ledger, roster }
    }
}

#[async_trait::async_trait]
impl InteractiveAction for TeamSelectAction {
    async fn run(
        &self,
        slack: &dyn SlackApi,
        selected: &str,
        user_id: &str,
    ) -> Result<(), AppError> {
        let team = join_team(&self.ledger, &self.roster, selected, user_id).await?;

        // Posting to a user id lands in the bot's DM with that user
        slack
            .post_message(OutgoingMessage::text(
                user_id,
                format!("You joined team *{}*", team),
            ))
            .await
    }
}

async fn join_team(
    ledger: &Ledger,
    roster: &Roster,
    requested: &str,
    user_id: &str,
) -> Result<String, AppError> {
    let team = roster
        .find(requested)
        .ok_or_else(|| AppError::invalid_argument(format!("{} is not a known team", requested)))?
        .to_string();

    let previous = ledger.set_team(user_id, &team).await;
    info!(user = %user_id, team = %team, previous = ?previous, "Team updated");
    Ok(team)
}

/// Block Kit section with a static select listing every team
fn team_picker(roster: &Roster) -> Value {
    let options: Vec<Value> = roster
        .names()
        .iter()
        .take(MAX_SELECT_OPTIONS)
        .map(|team| {
            json!({
                "text": {"type": "plain_text", "text": team},
                "value": team,
            })
        })
        .collect();

    json!([{
        "type": "section",
        "block_id": "select_team",
        "text": {"type": "mrkdwn", "text": "Pick your team"},
        "accessory": {
            "type": "static_select",
            "action_id": SELECT_TEAM_ACTION_ID,
            "placeholder": {"type": "plain_text", "text": "Select a team"},
            "options": options,
        }
    }])
}
