//! PostgreSQL adapter for XpEventStore.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::foundation::{DomainError, Timestamp, UserId, XpEventId};
use crate::domain::progression::{GrantDate, XpEvent, XpEventKind, XpEventType};
use crate::ports::{AppendOutcome, XpEventStore};

/// PostgreSQL implementation of XpEventStore.
///
/// Duplicate detection rides on the `xp_events_dedup_idx` unique index over
/// `(user_id, event_type, dedup_key)`; the insert uses `ON CONFLICT DO
/// NOTHING` and judges the outcome by `rows_affected`, so concurrent writers
/// race safely at the database rather than in application code.
pub struct PgXpEventStore {
    pool: PgPool,
}

impl PgXpEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_event(row: &sqlx::postgres::PgRow) -> Result<XpEvent, DomainError> {
        let id: Uuid = row.get("id");
        let user_id: String = row.get("user_id");
        let amount: i64 = row.get("xp_amount");
        let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");

        let kind: XpEventKind = serde_json::from_value(row.get("metadata")).map_err(|e| {
            DomainError::persistence(format!("Failed to deserialize event metadata: {}", e))
        })?;

        let user_id = UserId::new(user_id)
            .map_err(|e| DomainError::persistence(format!("Invalid stored user ID: {}", e)))?;

        Ok(XpEvent::from_parts(
            XpEventId::from_uuid(id),
            user_id,
            kind,
            amount,
            Timestamp::from_datetime(created_at),
        ))
    }
}

#[async_trait]
impl XpEventStore for PgXpEventStore {
    async fn append(&self, event: &XpEvent) -> Result<AppendOutcome, DomainError> {
        let kind = event.kind();
        let metadata = serde_json::to_value(kind).map_err(|e| {
            DomainError::persistence(format!("Failed to serialize event metadata: {}", e))
        })?;

        let result = sqlx::query(
            r#"
            INSERT INTO xp_events (id, user_id, event_type, dedup_key, xp_amount, metadata, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id, event_type, dedup_key) DO NOTHING
            "#,
        )
        .bind(event.id().as_uuid())
        .bind(event.user_id().as_str())
        .bind(kind.event_type().as_str())
        .bind(kind.dedup_key())
        .bind(event.amount())
        .bind(metadata)
        .bind(event.created_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::persistence(format!("Database error: {}", e)))?;

        if result.rows_affected() == 0 {
            Ok(AppendOutcome::Duplicate)
        } else {
            Ok(AppendOutcome::Appended)
        }
    }

    async fn latest_contribution_date(
        &self,
        user_id: &UserId,
    ) -> Result<Option<GrantDate>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT dedup_key FROM xp_events
            WHERE user_id = $1 AND event_type = $2
            ORDER BY dedup_key DESC
            LIMIT 1
            "#,
        )
        .bind(user_id.as_str())
        .bind(XpEventType::ContributionDay.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::persistence(format!("Database error: {}", e)))?;

        match row {
            Some(row) => {
                let key: String = row.get("dedup_key");
                // Contribution dedup keys are ISO dates, so the lexicographic
                // ORDER BY above is also chronological.
                let date = NaiveDate::parse_from_str(&key, "%Y-%m-%d").map_err(|e| {
                    DomainError::persistence(format!("Invalid stored grant date '{}': {}", key, e))
                })?;
                Ok(Some(GrantDate::from_naive(date)))
            }
            None => Ok(None),
        }
    }

    async fn has_streak_milestone(
        &self,
        user_id: &UserId,
        streak_days: u32,
    ) -> Result<bool, DomainError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM xp_events
                WHERE user_id = $1 AND event_type = $2 AND dedup_key = $3
            )
            "#,
        )
        .bind(user_id.as_str())
        .bind(XpEventType::StreakMilestone.as_str())
        .bind(streak_days.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::persistence(format!("Database error: {}", e)))?;

        Ok(exists)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<XpEvent>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, xp_amount, metadata, created_at
            FROM xp_events
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id.as_str())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::persistence(format!("Database error: {}", e)))?;

        rows.iter().map(Self::row_to_event).collect()
    }

    async fn count_for_user(
        &self,
        user_id: &UserId,
        event_type: XpEventType,
    ) -> Result<u64, DomainError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM xp_events WHERE user_id = $1 AND event_type = $2",
        )
        .bind(user_id.as_str())
        .bind(event_type.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::persistence(format!("Database error: {}", e)))?;

        Ok(count as u64)
    }
}
