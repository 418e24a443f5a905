//! XpEventStore port for the append-only XP ledger.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::progression::{GrantDate, XpEvent, XpEventType};

/// Result of attempting to append an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// Event was inserted (first time seeing this occurrence).
    Appended,
    /// An event with the same (user, event type, dedup key) already exists.
    Duplicate,
}

/// Append-only store for XP events.
///
/// Implementations must enforce a uniqueness constraint across
/// `(user_id, event_type, dedup_key)` at the storage level - a conflicting
/// insert, not a pre-check, is how duplicate grants are detected, so that
/// concurrent writers from different processes cannot both land the same
/// logical event.
#[async_trait]
pub trait XpEventStore: Send + Sync {
    /// Attempt to append an event.
    ///
    /// Returns `AppendOutcome::Duplicate` when the dedup constraint rejects
    /// the insert; any other failure is a `PersistenceError`.
    async fn append(&self, event: &XpEvent) -> Result<AppendOutcome, DomainError>;

    /// The most recent contribution-day date already granted to this user,
    /// if any. Used by the contribution sync to bound its scan.
    async fn latest_contribution_date(
        &self,
        user_id: &UserId,
    ) -> Result<Option<GrantDate>, DomainError>;

    /// Whether a streak milestone with this exact length was already granted.
    async fn has_streak_milestone(
        &self,
        user_id: &UserId,
        streak_days: u32,
    ) -> Result<bool, DomainError>;

    /// Events for a user, newest first, for profile and audit views.
    async fn list_for_user(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<XpEvent>, DomainError>;

    /// Count of a user's events of one type (leaderboard and badge views).
    async fn count_for_user(
        &self,
        user_id: &UserId,
        event_type: XpEventType,
    ) -> Result<u64, DomainError>;
}
