use std::collections::HashMap;

use tokio::sync::RwLock;

/// One row of a leaderboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub name: String,
    pub bits: i64,
}

#[derive(Debug, Default)]
struct Member {
    bits: i64,
    team: Option<String>,
}

#[derive(Debug, Default)]
struct LedgerState {
    members: HashMap<String, Member>,
    /// Bits given to a team directly rather than to one of its members
    team_bits: HashMap<String, i64>,
}

/// In-memory bit balances and team membership
#[derive(Debug, Default)]
pub struct Ledger {
    state: RwLock<LedgerState>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `delta` (possibly negative) to a user's balance and return the new balance
    pub async fn adjust_user(&self, user_id: &str, delta: i64) -> i64 {
        let mut state = self.state.write().await;
        let member = state.members.entry(user_id.to_string()).or_default();
        member.bits = member.bits.saturating_add(delta);
        member.bits
    }

    /// Add `delta` to a team's direct balance and return the new direct balance
    pub async fn adjust_team(&self, team: &str, delta: i64) -> i64 {
        let mut state = self.state.write().await;
        let bits = state.team_bits.entry(team.to_string()).or_default();
        *bits = bits.saturating_add(delta);
        *bits
    }

    pub async fn balance(&self, user_id: &str) -> i64 {
        let state = self.state.read().await;
        state.members.get(user_id).map(|m| m.bits).unwrap_or(0)
    }

    /// Put a user on a team, returning the team they were on before
    pub async fn set_team(&self, user_id: &str, team: &str) -> Option<String> {
        let mut state = self.state.write().await;
        let member = state.members.entry(user_id.to_string()).or_default();
        member.team.replace(team.to_string())
    }

    pub async fn team_of(&self, user_id: &str) -> Option<String> {
        let state = self.state.read().await;
        state.members.get(user_id).and_then(|m| m.team.clone())
    }

    /// Users by descending balance, ties broken by user id
    pub async fn user_standings(&self, limit: usize) -> Vec<Standing> {
        let state = self.state.read().await;
        let mut standings: Vec<Standing> = state
            .members
            .iter()
            .map(|(id, m)| Standing {
                name: id.clone(),
                bits: m.bits,
            })
            .collect();
        sort_standings(&mut standings);
        standings.truncate(limit);
        standings
    }

    /// Totals for the given teams, direct bits plus member bits
    ///
    /// Every listed team appears even at zero; bits for teams no longer listed are ignored.
    pub async fn team_standings(&self, teams: &[String]) -> Vec<Standing> {
        let state = self.state.read().await;
        let mut totals: HashMap<&str, i64> = teams.iter().map(|t| (t.as_str(), 0)).collect();

        for (team, bits) in &state.team_bits {
            if let Some(total) = totals.get_mut(team.as_str()) {
                *total = total.saturating_add(*bits);
            }
        }
        for member in state.members.values() {
            if let Some(total) = member.team.as_deref().and_then(|t| totals.get_mut(t)) {
                *total = total.saturating_add(member.bits);
            }
        }

        let mut standings: Vec<Standing> = totals
            .into_iter()
            .map(|(name, bits)| Standing {
                name: name.to_string(),
                bits,
            })
            .collect();
        sort_standings(&mut standings);
        standings
    }
}

fn sort_standings(standings: &mut [Standing]) {
    standings.sort_by(|a, b| b.bits.cmp(&a.bits).then_with(|| a.name.cmp(&b.name)));
}
