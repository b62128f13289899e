use std::sync::Arc;

use tracing::info;

use super::args::{parse_transfer, Target};
use super::{format_bits, Ledger, Roster};
use crate::domain::dispatch::{Action, Invocation};
use crate::domain::slack::{OutgoingMessage, SlackApi};
use crate::utils::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    Give,
    Remove,
}

impl TransferKind {
    fn verb(&self) -> &'static str {
        match self {
            TransferKind::Give => "gave",
            TransferKind::Remove => "removed",
        }
    }

    fn preposition(&self) -> &'static str {
        match self {
            TransferKind::Give => "to",
            TransferKind::Remove => "from",
        }
    }

    fn signed(&self, amount: i64) -> i64 {
        match self {
            TransferKind::Give => amount,
            TransferKind::Remove => -amount,
        }
    }
}

/// `give` and `remove`
pub struct TransferAction {
    kind: TransferKind,
    ledger: Arc<Ledger>,
    roster: Roster,
}

impl TransferAction {
    pub fn new(kind: TransferKind, ledger: Arc<Ledger>, roster: Roster) -> Self {
        Self {
            kind,
            ledger,
            roster,
        }
    }
}

#[async_trait::async_trait]
impl Action for TransferAction {
    async fn run(&self, slack: &dyn SlackApi, invocation: &Invocation) -> Result<(), AppError> {
        let transfer = parse_transfer(invocation.rest(), &self.roster)?;

        let to_self = transfer
            .targets
            .iter()
            .any(|t| matches!(t, Target::User(id) if id == &invocation.user_id));
        if self.kind == TransferKind::Give && to_self {
            return Err(AppError::invalid_argument("You can't give bits to yourself"));
        }

        let delta = self.kind.signed(transfer.amount);
        let mut lines = Vec::with_capacity(transfer.targets.len());
        for target in &transfer.targets {
            let total = match target {
                Target::User(id) => self.ledger.adjust_user(id, delta).await,
                Target::Team(name) => self.ledger.adjust_team(name, delta).await,
            };
            info!(
                from = %invocation.user_id,
                recipient = ?target,
                delta,
                total,
                "Bits updated"
            );
            lines.push(format!(
                "<@{}> {} {} {} {} (now {})",
                invocation.user_id,
                self.kind.verb(),
                format_bits(transfer.amount),
                self.kind.preposition(),
                target.display(),
                total
            ));
        }

        // Balances stay changed even if this post fails and the message gets `x`
        slack
            .post_message(OutgoingMessage::text(
                &invocation.channel_id,
                lines.join("\n"),
            ))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::slack::MockSlackApi;

    fn invocation(text: &str) -> Invocation {
        Invocation {
            arguments: text.split(' ').map(String::from).collect(),
            user_id: "UALICE".to_string(),
            channel_id: "C1".to_string(),
        }
    }

    fn action(kind: TransferKind, ledger: &Arc<Ledger>) -> TransferAction {
        TransferAction::new(
            kind,
            ledger.clone(),
            Roster::new(vec!["Red".to_string()]),
        )
    }

    #[tokio::test]
    async fn should_give_bits_and_confirm_in_channel() {
        // Arrange
        let ledger = Arc::new(Ledger::new());
        let mut slack = MockSlackApi::new();
        slack
            .expect_post_message()
            .withf(|m| m.channel == "C1" && m.text == "<@UALICE> gave 5 bits to <@UBOB> (now 5)")
            .times(1)
            .returning(|_| Ok(()));

        // Act
        let result = action(TransferKind::Give, &ledger)
            .run(&slack, &invocation("<@UBOT> give <@UBOB> 5"))
            .await;

        // Assert
        assert!(result.is_ok());
        assert_eq!(ledger.balance("UBOB").await, 5);
    }

    #[tokio::test]
    async fn should_give_one_bit_to_team_by_default() {
        let ledger = Arc::new(Ledger::new());
        let mut slack = MockSlackApi::new();
        slack
            .expect_post_message()
            .withf(|m| m.text == "<@UALICE> gave 1 bit to team *Red* (now 1)")
            .times(1)
            .returning(|_| Ok(()));

        action(TransferKind::Give, &ledger)
            .run(&slack, &invocation("<@UBOT> give red"))
            .await
            .unwrap();

        let standings = ledger.team_standings(&["Red".to_string()]).await;
        assert_eq!(standings[0].bits, 1);
    }

    #[tokio::test]
    async fn should_reject_giving_to_self() {
        // Arrange
        let ledger = Arc::new(Ledger::new());
        let mut slack = MockSlackApi::new();
        slack.expect_post_message().never();

        // Act
        let result = action(TransferKind::Give, &ledger)
            .run(&slack, &invocation("<@UBOT> give <@UALICE> 100"))
            .await;

        // Assert
        assert_eq!(
            result,
            Err(AppError::invalid_argument("You can't give bits to yourself"))
        );
        assert_eq!(ledger.balance("UALICE").await, 0);
    }

    #[tokio::test]
    async fn should_remove_bits_below_zero() {
        let ledger = Arc::new(Ledger::new());
        ledger.adjust_user("UBOB", 2).await;
        let mut slack = MockSlackApi::new();
        slack
            .expect_post_message()
            .withf(|m| m.text == "<@UALICE> removed 3 bits from <@UBOB> (now -1)")
            .times(1)
            .returning(|_| Ok(()));

        action(TransferKind::Remove, &ledger)
            .run(&slack, &invocation("<@UBOT> remove <@UBOB> 3"))
            .await
            .unwrap();

        assert_eq!(ledger.balance("UBOB").await, -1);
    }

    #[tokio::test]
    async fn should_keep_ledger_change_when_confirmation_fails() {
        let ledger = Arc::new(Ledger::new());
        let mut slack = MockSlackApi::new();
        slack
            .expect_post_message()
            .returning(|_| Err(AppError::SlackApi("not_in_channel".to_string())));

        let result = action(TransferKind::Give, &ledger)
            .run(&slack, &invocation("<@UBOT> give <@UBOB>"))
            .await;

        assert_eq!(
            result,
            Err(AppError::SlackApi("not_in_channel".to_string()))
        );
        assert_eq!(ledger.balance("UBOB").await, 1);
    }

    #[tokio::test]
    async fn should_give_to_team_with_spaces_in_its_name() {
        // Arrange
        let ledger = Arc::new(Ledger::new());
        let roster = Roster::new(vec!["Blue Whales".to_string()]);
        let mut slack = MockSlackApi::new();
        slack
            .expect_post_message()
            .withf(|m| m.text == "<@UALICE> gave 3 bits to team *Blue Whales* (now 3)")
            .times(1)
            .returning(|_| Ok(()));

        // Act
        let result = TransferAction::new(TransferKind::Give, ledger.clone(), roster)
            .run(&slack, &invocation("<@UBOT> give Blue Whales 3"))
            .await;

        // Assert
        assert!(result.is_ok());
        let standings = ledger.team_standings(&["Blue Whales".to_string()]).await;
        assert_eq!(standings[0].bits, 3);
    }
}
