//! In-memory XpEventStore.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::progression::{GrantDate, XpEvent, XpEventType};
use crate::ports::{AppendOutcome, XpEventStore};

/// In-memory implementation of XpEventStore.
///
/// The dedup set under the write lock plays the role of the database's
/// unique index: insertion into the set and the event list happen in one
/// critical section, so concurrent appends of the same occurrence resolve
/// to exactly one `Appended`.
pub struct InMemoryXpEventStore {
    events: RwLock<Vec<XpEvent>>,
    dedup: RwLock<HashSet<(String, &'static str, String)>>,
    fail_appends: AtomicBool,
}

impl InMemoryXpEventStore {
    pub fn new() -> Self {
        Self {
            events: RwLock::new(Vec::new()),
            dedup: RwLock::new(HashSet::new()),
            fail_appends: AtomicBool::new(false),
        }
    }

    /// Makes subsequent appends fail with a persistence error (tests).
    pub fn set_fail_appends(&self, fail: bool) {
        self.fail_appends.store(fail, Ordering::SeqCst);
    }

    /// All stored events, in insertion order (test assertions).
    pub async fn all_events(&self) -> Vec<XpEvent> {
        self.events.read().await.clone()
    }

    /// Number of stored events (test assertions).
    pub async fn event_count(&self) -> usize {
        self.events.read().await.len()
    }
}

impl Default for InMemoryXpEventStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl XpEventStore for InMemoryXpEventStore {
    async fn append(&self, event: &XpEvent) -> Result<AppendOutcome, DomainError> {
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(DomainError::persistence("Injected append failure"));
        }

        let kind = event.kind();
        let key = (
            event.user_id().as_str().to_string(),
            kind.event_type().as_str(),
            kind.dedup_key(),
        );

        // Take the dedup lock first and hold it across the push so the
        // check and insert are one atomic step, like the unique index.
        let mut dedup = self.dedup.write().await;
        if dedup.contains(&key) {
            return Ok(AppendOutcome::Duplicate);
        }
        dedup.insert(key);
        self.events.write().await.push(event.clone());

        Ok(AppendOutcome::Appended)
    }

    async fn latest_contribution_date(
        &self,
        user_id: &UserId,
    ) -> Result<Option<GrantDate>, DomainError> {
        let events = self.events.read().await;
        let latest = events
            .iter()
            .filter(|e| e.user_id() == user_id)
            .filter_map(|e| match e.kind() {
                crate::domain::progression::XpEventKind::ContributionDay { date } => Some(*date),
                _ => None,
            })
            .max();
        Ok(latest)
    }

    async fn has_streak_milestone(
        &self,
        user_id: &UserId,
        streak_days: u32,
    ) -> Result<bool, DomainError> {
        let dedup = self.dedup.read().await;
        Ok(dedup.contains(&(
            user_id.as_str().to_string(),
            XpEventType::StreakMilestone.as_str(),
            streak_days.to_string(),
        )))
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<XpEvent>, DomainError> {
        let events = self.events.read().await;
        let mut matching: Vec<XpEvent> = events
            .iter()
            .filter(|e| e.user_id() == user_id)
            .cloned()
            .collect();
        matching.sort_by_key(|e| std::cmp::Reverse(e.created_at()));
        matching.truncate(limit as usize);
        Ok(matching)
    }

    async fn count_for_user(
        &self,
        user_id: &UserId,
        event_type: XpEventType,
    ) -> Result<u64, DomainError> {
        let events = self.events.read().await;
        Ok(events
            .iter()
            .filter(|e| e.user_id() == user_id && e.kind().event_type() == event_type)
            .count() as u64)
    }
}
