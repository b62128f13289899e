use std::sync::Arc;

use super::command::Command;
use crate::domain::slack::SlackApi;
use crate::utils::AppError;

/// A single command invocation handed to an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Every space-separated word of the message, starting with the bot mention and the command
    pub arguments: Vec<String>,
    pub user_id: String,
    pub channel_id: String,
}

impl Invocation {
    /// Words after the command token
    pub fn rest(&self) -> &[String] {
        self.arguments.get(2..).unwrap_or(&[])
    }
}

/// Handler bound to one command
#[async_trait::async_trait]
pub trait Action: Send + Sync {
    async fn run(&self, slack: &dyn SlackApi, invocation: &Invocation) -> Result<(), AppError>;
}

/// Handler for a value picked in an interactive component
#[async_trait::async_trait]
pub trait InteractiveAction: Send + Sync {
    async fn run(&self, slack: &dyn SlackApi, selected: &str, user_id: &str)
        -> Result<(), AppError>;
}

/// Exactly one handler per command, plus the team-selection callback
#[derive(Clone)]
pub struct ActionTable {
    pub give: Arc<dyn Action>,
    pub remove: Arc<dyn Action>,
    pub leaderboard: Arc<dyn Action>,
    pub set_team: Arc<dyn Action>,
    pub team_leaderboard: Arc<dyn Action>,
    pub help: Arc<dyn Action>,
    pub select_team: Arc<dyn InteractiveAction>,
}

impl ActionTable {
    pub fn handler(&self, command: Command) -> &dyn Action {
        match command {
            Command::Give => self.give.as_ref(),
            Command::Remove => self.remove.as_ref(),
            Command::Leaderboard => self.leaderboard.as_ref(),
            Command::SetTeam => self.set_team.as_ref(),
            Command::TeamLeaderboard => self.team_leaderboard.as_ref(),
            Command::Help => self.help.as_ref(),
        }
    }
}
