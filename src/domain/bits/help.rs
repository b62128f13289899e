use crate::domain::dispatch::{Action, Command, Invocation};
use crate::domain::slack::{OutgoingMessage, SlackApi};
use crate::utils::AppError;

/// `help`
pub struct HelpAction;

#[async_trait::async_trait]
impl Action for HelpAction {
    async fn run(&self, slack: &dyn SlackApi, invocation: &Invocation) -> Result<(), AppError> {
        slack
            .post_message(OutgoingMessage::text(&invocation.channel_id, help_text()))
            .await
    }
}

fn usage(command: Command) -> (&'static str, &'static str) {
    match command {
        Command::Give => (
            "give @user|team... [amount]",
            "give bits to users or teams (1 by default)",
        ),
        Command::Remove => (
            "remove @user|team... [amount]",
            "take bits away from users or teams",
        ),
        Command::Leaderboard => ("leaderboard [n]", "show the top n users (10 by default)"),
        Command::SetTeam => ("set-team [team]", "join a team, or pick one from a list"),
        Command::TeamLeaderboard => ("team-leaderboard", "show every team's total"),
        Command::Help => ("help", "show this message"),
    }
}

pub fn help_text() -> String {
    let mut text = String::from("*Commands* (mention me first, e.g. `@bitbot give @alice 5`)");
    for command in Command::ALL {
        let (syntax, description) = usage(command);
        text.push_str(&format!("\n• `{}`: {}", syntax, description));
    }
    text
}
