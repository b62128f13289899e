use std::sync::Arc;

use super::args::parse_amount;
use super::ledger::Standing;
use super::{format_bits, Ledger, Roster};
use crate::domain::dispatch::{Action, Invocation};
use crate::domain::slack::{OutgoingMessage, SlackApi};
use crate::utils::AppError;

const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 50;

/// `leaderboard [n]`
pub struct LeaderboardAction {
    ledger: Arc<Ledger>,
}

impl LeaderboardAction {
    pub fn new(ledger: Arc<Ledger>) -> Self {
        Self { ledger }
    }
}

#[async_trait::async_trait]
impl Action for LeaderboardAction {
    async fn run(&self, slack: &dyn SlackApi, invocation: &Invocation) -> Result<(), AppError> {
        let limit = match invocation.rest().iter().find(|w| !w.is_empty()) {
            Some(word) => (parse_amount(word)? as usize).min(MAX_LIMIT),
            None => DEFAULT_LIMIT,
        };

        let standings = self.ledger.user_standings(limit).await;
        let text = if standings.is_empty() {
            "Nobody has any bits yet.".to_string()
        } else {
            render(":trophy: *Leaderboard*", &standings, |name| {
                format!("<@{}>", name)
            })
        };

        slack
            .post_message(OutgoingMessage::text(&invocation.channel_id, text))
            .await
    }
}

/// `team-leaderboard`
pub struct TeamLeaderboardAction {
    ledger: Arc<Ledger>,
    roster: Roster,
}

impl TeamLeaderboardAction {
    pub fn new(ledger: Arc<Ledger>, roster: Roster) -> Self {
        Self { ledger, roster }
    }
}

#[async_trait::async_trait]
impl Action for TeamLeaderboardAction {
    async fn run(&self, slack: &dyn SlackApi, invocation: &Invocation) -> Result<(), AppError> {
        if self.roster.is_empty() {
            return Err(AppError::invalid_argument("No teams are configured"));
        }

        let standings = self.ledger.team_standings(self.roster.names()).await;
        let text = render(":trophy: *Team leaderboard*", &standings, |name| {
            format!("*{}*", name)
        });

        slack
            .post_message(OutgoingMessage::text(&invocation.channel_id, text))
            .await
    }
}

fn render(title: &str, standings: &[Standing], label: impl Fn(&str) -> String) -> String {
    let mut text = title.to_string();
    for (rank, standing) in standings.iter().enumerate() {
        text.push_str(&format!(
            "\n{}. {} - {}",
            rank + 1,
            label(&standing.name),
            format_bits(standing.bits)
        ));
    }
    text
}
