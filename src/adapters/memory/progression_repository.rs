//! In-memory ProgressionRepository.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::domain::progression::{GrantDate, UserProgression};
use crate::ports::{ClaimOutcome, ProgressionRepository};

struct Record {
    total_xp: i64,
    updated_at: Timestamp,
    last_login_grant: Option<GrantDate>,
}

/// In-memory implementation of ProgressionRepository.
///
/// The daily-login claim performs its read-compare-write under a single
/// write lock, matching the atomicity of the database's conditional UPDATE.
pub struct InMemoryProgressionRepository {
    records: RwLock<HashMap<String, Record>>,
}

impl InMemoryProgressionRepository {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Convenience for tests: create and store a fresh aggregate.
    pub async fn seed_user(&self, user_id: &UserId) {
        let mut records = self.records.write().await;
        records.insert(
            user_id.as_str().to_string(),
            Record {
                total_xp: 0,
                updated_at: Timestamp::now(),
                last_login_grant: None,
            },
        );
    }
}

impl Default for InMemoryProgressionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProgressionRepository for InMemoryProgressionRepository {
    async fn create(&self, progression: &UserProgression) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        records.insert(
            progression.user_id().as_str().to_string(),
            Record {
                total_xp: progression.total_xp(),
                updated_at: progression.updated_at(),
                last_login_grant: None,
            },
        );
        Ok(())
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserProgression>, DomainError> {
        let records = self.records.read().await;
        Ok(records.get(user_id.as_str()).map(|r| {
            UserProgression::from_parts(user_id.clone(), r.total_xp, r.updated_at)
        }))
    }

    async fn update_totals(
        &self,
        user_id: &UserId,
        total_xp: i64,
        _level: u32,
    ) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        match records.get_mut(user_id.as_str()) {
            Some(record) => {
                record.total_xp = total_xp;
                record.updated_at = Timestamp::now();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::UserNotFound,
                format!("No progression record for user {}", user_id),
            )),
        }
    }

    async fn claim_daily_login(
        &self,
        user_id: &UserId,
        date: GrantDate,
    ) -> Result<ClaimOutcome, DomainError> {
        let mut records = self.records.write().await;
        match records.get_mut(user_id.as_str()) {
            Some(record) => {
                if record.last_login_grant == Some(date) {
                    Ok(ClaimOutcome::AlreadyClaimed)
                } else {
                    record.last_login_grant = Some(date);
                    Ok(ClaimOutcome::Claimed)
                }
            }
            None => Err(DomainError::user_not_found(user_id)),
        }
    }
}
