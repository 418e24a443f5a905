//! GrantXp - the ledger operation: append an event, then recompute totals.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::domain::progression::{XpEvent, XpEventKind};
use crate::ports::{AppendOutcome, ProgressionRepository, XpEventStore};

/// Command to grant XP for a single logical occurrence.
#[derive(Debug, Clone)]
pub struct GrantXpCommand {
    pub user_id: UserId,
    pub kind: XpEventKind,
    pub amount: i64,
}

/// Result of a grant attempt. A duplicate grant is a success with
/// `xp_gained == 0`, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrantXpResult {
    pub xp_gained: i64,
    pub new_xp: i64,
    pub new_level: u32,
    pub leveled_up: bool,
}

/// Handler for granting XP.
///
/// Ordering is the one subtle correctness property here: the event is
/// appended first (the store's uniqueness constraint is the duplicate
/// detector, never a pre-check), and the aggregate is updated only after a
/// durable append. The aggregate therefore never advances without a
/// corresponding event and remains reconstructible by replay.
pub struct GrantXpHandler {
    events: Arc<dyn XpEventStore>,
    progression: Arc<dyn ProgressionRepository>,
}

impl GrantXpHandler {
    pub fn new(events: Arc<dyn XpEventStore>, progression: Arc<dyn ProgressionRepository>) -> Self {
        Self { events, progression }
    }

    pub async fn handle(&self, cmd: GrantXpCommand) -> Result<GrantXpResult, DomainError> {
        // 1. The aggregate must exist; an unknown user is a caller bug.
        let mut aggregate = self
            .progression
            .find_by_user(&cmd.user_id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(&cmd.user_id))?;

        let event = XpEvent::new(cmd.user_id.clone(), cmd.kind, cmd.amount)
            .map_err(|e| DomainError::validation("xp_amount", e.to_string()))?;

        // 2. Append first. The store's constraint arbitrates concurrent
        //    grants of the same occurrence.
        match self.events.append(&event).await? {
            AppendOutcome::Duplicate => {
                // 3. Already granted: an idempotent no-op, reported as
                //    success with zero gain and the aggregate untouched.
                tracing::debug!(
                    user_id = %cmd.user_id,
                    event_type = %event.kind().event_type(),
                    dedup_key = %event.kind().dedup_key(),
                    "Skipping duplicate XP grant"
                );
                Ok(GrantXpResult {
                    xp_gained: 0,
                    new_xp: aggregate.total_xp(),
                    new_level: aggregate.level(),
                    leveled_up: false,
                })
            }
            AppendOutcome::Appended => {
                // 4. Recompute and persist the aggregate. If this fails the
                //    event is still durable and the aggregate stays behind;
                //    it catches up on a replay or the next successful grant
                //    recomputation from the log.
                let gain = aggregate.apply_gain(cmd.amount, Timestamp::now());
                if let Err(e) = self
                    .progression
                    .update_totals(&cmd.user_id, gain.new_xp, gain.new_level)
                    .await
                {
                    tracing::warn!(
                        user_id = %cmd.user_id,
                        error = %e,
                        "XP event recorded but aggregate update failed"
                    );
                    return Err(e);
                }

                if gain.leveled_up {
                    tracing::info!(
                        user_id = %cmd.user_id,
                        level = gain.new_level,
                        "User leveled up"
                    );
                }

                Ok(GrantXpResult {
                    xp_gained: gain.xp_gained,
                    new_xp: gain.new_xp,
                    new_level: gain.new_level,
                    leveled_up: gain.leveled_up,
                })
            }
        }
    }
}
