//! Bit bookkeeping actions
//!
//! The six command handlers and the team-selection callback, all backed by one shared [`Ledger`].

pub mod args;
pub mod help;
pub mod leaderboard;
pub mod ledger;
pub mod team;
pub mod transfer;

use std::sync::Arc;

pub use ledger::{Ledger, Standing};

use crate::domain::dispatch::ActionTable;
use help::HelpAction;
use leaderboard::{LeaderboardAction, TeamLeaderboardAction};
use team::{SetTeamAction, TeamSelectAction};
use transfer::{TransferAction, TransferKind};

/// Configured team names
#[derive(Debug, Clone, Default)]
pub struct Roster {
    teams: Arc<Vec<String>>,
}

impl Roster {
    pub fn new(teams: Vec<String>) -> Self {
        Self {
            teams: Arc::new(teams),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.teams
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Case-insensitive lookup returning the configured spelling
    pub fn find(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        self.teams
            .iter()
            .find(|t| t.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }
}

/// Wire every command to its handler over a shared ledger
pub fn action_table(ledger: Arc<Ledger>, roster: Roster) -> ActionTable {
    ActionTable {
        give: Arc::new(TransferAction::new(
            TransferKind::Give,
            ledger.clone(),
            roster.clone(),
        )),
        remove: Arc::new(TransferAction::new(
            TransferKind::Remove,
            ledger.clone(),
            roster.clone(),
        )),
        leaderboard: Arc::new(LeaderboardAction::new(ledger.clone())),
        set_team: Arc::new(SetTeamAction::new(ledger.clone(), roster.clone())),
        team_leaderboard: Arc::new(TeamLeaderboardAction::new(ledger.clone(), roster.clone())),
        help: Arc::new(HelpAction),
        select_team: Arc::new(TeamSelectAction::new(ledger, roster)),
    }
}

/// `1 bit`, `5 bits`
pub fn format_bits(amount: i64) -> String {
    if amount == 1 {
        "1 bit".to_string()
    } else {
        format!("{} bits", amount)
    }
}
