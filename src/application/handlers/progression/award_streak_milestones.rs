//! AwardStreakMilestones - one-time XP rewards for streak lengths.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::progression::{XpEventKind, STREAK_MILESTONES};
use crate::ports::XpEventStore;

use super::grant_xp::{GrantXpCommand, GrantXpHandler};

/// Command to award any milestones the current streak has reached.
#[derive(Debug, Clone)]
pub struct AwardStreakMilestonesCommand {
    pub user_id: UserId,
    /// Consecutive qualifying days, computed by the caller.
    pub current_streak: u32,
}

/// Result of a milestone sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwardStreakMilestonesResult {
    /// Streak lengths granted in this call, ascending.
    pub awarded: Vec<u32>,
    pub xp_gained: i64,
}

/// Handler for the streak-milestone policy.
///
/// Walks the milestone table and grants every threshold the streak has
/// reached that was never granted before. Several can land in one call: a
/// user hitting day 90 on an install that never ran grants also collects
/// the 7- and 30-day rewards.
pub struct AwardStreakMilestonesHandler {
    events: Arc<dyn XpEventStore>,
    grant: Arc<GrantXpHandler>,
}

impl AwardStreakMilestonesHandler {
    pub fn new(events: Arc<dyn XpEventStore>, grant: Arc<GrantXpHandler>) -> Self {
        Self { events, grant }
    }

    pub async fn handle(
        &self,
        cmd: AwardStreakMilestonesCommand,
    ) -> Result<AwardStreakMilestonesResult, DomainError> {
        let mut awarded = Vec::new();
        let mut xp_gained = 0;

        for milestone in STREAK_MILESTONES {
            if milestone.days > cmd.current_streak {
                // Table is ascending; nothing further is reachable.
                break;
            }
            if self
                .events
                .has_streak_milestone(&cmd.user_id, milestone.days)
                .await?
            {
                continue;
            }

            let result = self
                .grant
                .handle(GrantXpCommand {
                    user_id: cmd.user_id.clone(),
                    kind: XpEventKind::StreakMilestone {
                        streak_days: milestone.days,
                    },
                    amount: milestone.xp,
                })
                .await?;

            // The existence check above is only an optimization; the grant's
            // dedup constraint is what actually guarantees once-ever.
            if result.xp_gained > 0 {
                awarded.push(milestone.days);
                xp_gained += result.xp_gained;
            }
        }

        if !awarded.is_empty() {
            tracing::info!(
                user_id = %cmd.user_id,
                streak = cmd.current_streak,
                awarded = ?awarded,
                xp_gained,
                "Streak milestones awarded"
            );
        }

        Ok(AwardStreakMilestonesResult { awarded, xp_gained })
    }
}
