//! Argument parsing shared by the bit actions

use super::Roster;
use crate::domain::dispatch::router::extract_user_id;
use crate::utils::AppError;

/// Recipient of a give or remove
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    User(String),
    Team(String),
}

impl Target {
    /// How the target is written back in Slack
    pub fn display(&self) -> String {
        match self {
            Target::User(id) => format!("<@{}>", id),
            Target::Team(name) => format!("team *{}*", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub targets: Vec<Target>,
    pub amount: i64,
}

/// Parse `<target>... [amount]`
///
/// Targets are user mentions or team names from the roster; the amount defaults to 1.
/// Team names may span several words, the longest configured match wins.
pub fn parse_transfer(words: &[String], roster: &Roster) -> Result<Transfer, AppError> {
    let mut words: Vec<&str> = words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .collect();

    let amount = match words.last().copied().filter(|w| looks_numeric(w)) {
        Some(last) => {
            let amount = parse_amount(last)?;
            words.pop();
            amount
        }
        None => 1,
    };

    let mut targets: Vec<Target> = Vec::new();
    let mut rest = words.as_slice();
    while !rest.is_empty() {
        let (target, used) = parse_target(rest, roster)?;
        if !targets.contains(&target) {
            targets.push(target);
        }
        rest = &rest[used..];
    }

    if targets.is_empty() {
        return Err(AppError::invalid_argument(
            "Mention at least one user or team",
        ));
    }

    Ok(Transfer { targets, amount })
}

/// Read one target from the front of `words`, returning it and how many words it took
fn parse_target(words: &[&str], roster: &Roster) -> Result<(Target, usize), AppError> {
    let word = words[0];
    if let Some(id) = extract_user_id(word) {
        return Ok((Target::User(id.to_string()), 1));
    }
    for len in (1..=words.len()).rev() {
        if let Some(team) = roster.find(&words[..len].join(" ")) {
            return Ok((Target::Team(team.to_string()), len));
        }
    }
    if looks_numeric(word) {
        return Err(AppError::invalid_argument(
            "The amount must come after every user or team",
        ));
    }
    Err(AppError::invalid_argument(format!(
        "{} is not a user mention or a known team",
        word
    )))
}

fn looks_numeric(word: &str) -> bool {
    let digits = word.strip_prefix(&['-', '+'][..]).unwrap_or(word);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Parse a strictly positive whole amount
pub fn parse_amount(text: &str) -> Result<i64, AppError> {
    let amount: i64 = text
        .parse()
        .map_err(|_| AppError::invalid_argument(format!("{} is not a valid amount", text)))?;

    if amount <= 0 {
        Err(AppError::invalid_argument("Amount must be positive"))
    } else {
        Ok(amount)
    }
}
