use std::fmt;
use std::str::FromStr;

use super::error::DispatchError;

/// Commands the bot understands, as the second word of a message addressed to it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Give,
    Remove,
    Leaderboard,
    SetTeam,
    TeamLeaderboard,
    Help,
}

impl Command {
    pub const ALL: [Command; 6] = [
        Command::Give,
        Command::Remove,
        Command::Leaderboard,
        Command::SetTeam,
        Command::TeamLeaderboard,
        Command::Help,
    ];

    /// Token users type to select this command
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Give => "give",
            Command::Remove => "remove",
            Command::Leaderboard => "leaderboard",
            Command::SetTeam => "set-team",
            Command::TeamLeaderboard => "team-leaderboard",
            Command::Help => "help",
        }
    }
}

impl FromStr for Command {
    type Err = DispatchError;

    /// Tokens are matched exactly, `Give` is not `give`
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .into_iter()
            .find(|c| c.as_str() == token)
            .ok_or_else(|| DispatchError::InvalidCommand(token.to_string()))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
