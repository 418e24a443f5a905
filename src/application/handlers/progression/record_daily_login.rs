//! RecordDailyLogin - once-per-day login XP via an atomic claim.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::progression::{GrantDate, XpEventKind, DAILY_LOGIN_XP};
use crate::ports::{ClaimOutcome, ProgressionRepository};

use super::grant_xp::{GrantXpCommand, GrantXpHandler, GrantXpResult};

/// Command to record a login and grant the daily XP if due.
#[derive(Debug, Clone)]
pub struct RecordDailyLoginCommand {
    pub user_id: UserId,
    /// The login's calendar date, normally `GrantDate::today()`; injectable
    /// for tests.
    pub date: GrantDate,
}

/// Result of a login record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordDailyLoginResult {
    /// `None` when today's XP was already granted.
    pub grant: Option<GrantXpResult>,
}

/// Handler for the daily-login policy.
///
/// The conditional claim on the aggregate row is the mutual-exclusion
/// mechanism: of any number of concurrent logins for the same day, exactly
/// one observes `Claimed` and proceeds to the grant. The grant itself then
/// dedups on the date, so even a lost claim race cannot double-count.
pub struct RecordDailyLoginHandler {
    progression: Arc<dyn ProgressionRepository>,
    grant: Arc<GrantXpHandler>,
}

impl RecordDailyLoginHandler {
    pub fn new(progression: Arc<dyn ProgressionRepository>, grant: Arc<GrantXpHandler>) -> Self {
        Self { progression, grant }
    }

    pub async fn handle(
        &self,
        cmd: RecordDailyLoginCommand,
    ) -> Result<RecordDailyLoginResult, DomainError> {
        match self
            .progression
            .claim_daily_login(&cmd.user_id, cmd.date)
            .await?
        {
            ClaimOutcome::AlreadyClaimed => {
                tracing::debug!(
                    user_id = %cmd.user_id,
                    date = %cmd.date,
                    "Daily login XP already granted"
                );
                Ok(RecordDailyLoginResult { grant: None })
            }
            ClaimOutcome::Claimed => {
                let result = self
                    .grant
                    .handle(GrantXpCommand {
                        user_id: cmd.user_id,
                        kind: XpEventKind::DailyLogin { date: cmd.date },
                        amount: DAILY_LOGIN_XP,
                    })
                    .await?;
                Ok(RecordDailyLoginResult {
                    grant: Some(result),
                })
            }
        }
    }
}
