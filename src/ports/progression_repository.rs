//! ProgressionRepository port for the per-user aggregate.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::progression::{GrantDate, UserProgression};

/// Result of the atomic daily-login claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// This caller won the conditional write and may grant login XP.
    Claimed,
    /// A grant for this date already landed (here or in another process).
    AlreadyClaimed,
}

/// Repository for the user progression aggregate.
#[async_trait]
pub trait ProgressionRepository: Send + Sync {
    /// Create the aggregate row for a new user (0 XP, level 1).
    async fn create(&self, progression: &UserProgression) -> Result<(), DomainError>;

    /// Find the aggregate for a user.
    async fn find_by_user(&self, user_id: &UserId)
        -> Result<Option<UserProgression>, DomainError>;

    /// Persist recomputed totals. Both columns move together so the
    /// level-derivation invariant never breaks in storage.
    async fn update_totals(
        &self,
        user_id: &UserId,
        total_xp: i64,
        level: u32,
    ) -> Result<(), DomainError>;

    /// Atomically claim the daily-login grant for `date`.
    ///
    /// The write succeeds only if the stored last-grant date differs from
    /// `date`; exactly one of any number of concurrent callers observes
    /// `Claimed`. This conditional update is the mutual-exclusion mechanism,
    /// not a lock.
    async fn claim_daily_login(
        &self,
        user_id: &UserId,
        date: GrantDate,
    ) -> Result<ClaimOutcome, DomainError>;
}
