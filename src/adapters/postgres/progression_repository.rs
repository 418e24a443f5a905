//! PostgreSQL adapter for ProgressionRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::domain::progression::{GrantDate, UserProgression};
use crate::ports::{ClaimOutcome, ProgressionRepository};

/// PostgreSQL implementation of ProgressionRepository.
pub struct PgProgressionRepository {
    pool: PgPool,
}

impl PgProgressionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProgressionRepository for PgProgressionRepository {
    async fn create(&self, progression: &UserProgression) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO user_progression (user_id, total_xp, level, updated_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(progression.user_id().as_str())
        .bind(progression.total_xp())
        .bind(progression.level() as i32)
        .bind(progression.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::persistence(format!("Database error: {}", e)))?;

        Ok(())
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserProgression>, DomainError> {
        let row = sqlx::query(
            "SELECT user_id, total_xp, updated_at FROM user_progression WHERE user_id = $1",
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::persistence(format!("Database error: {}", e)))?;

        match row {
            Some(row) => {
                let stored_id: String = row.get("user_id");
                let total_xp: i64 = row.get("total_xp");
                let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

                let user_id = UserId::new(stored_id).map_err(|e| {
                    DomainError::persistence(format!("Invalid stored user ID: {}", e))
                })?;

                Ok(Some(UserProgression::from_parts(
                    user_id,
                    total_xp,
                    Timestamp::from_datetime(updated_at),
                )))
            }
            None => Ok(None),
        }
    }

    async fn update_totals(
        &self,
        user_id: &UserId,
        total_xp: i64,
        level: u32,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE user_progression
            SET total_xp = $2, level = $3, updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_str())
        .bind(total_xp)
        .bind(level as i32)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::persistence(format!("Database error: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::UserNotFound,
                format!("No progression record for user {}", user_id),
            ));
        }

        Ok(())
    }

    async fn claim_daily_login(
        &self,
        user_id: &UserId,
        date: GrantDate,
    ) -> Result<ClaimOutcome, DomainError> {
        // The WHERE clause makes the write conditional: only the first caller
        // for a given date moves the marker, and rows_affected tells us who
        // won. IS DISTINCT FROM also covers the never-granted NULL case.
        let result = sqlx::query(
            r#"
            UPDATE user_progression
            SET last_login_grant = $2
            WHERE user_id = $1 AND last_login_grant IS DISTINCT FROM $2
            "#,
        )
        .bind(user_id.as_str())
        .bind(date.as_naive())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::persistence(format!("Database error: {}", e)))?;

        if result.rows_affected() == 0 {
            // Either the marker already points at this date, or the user row
            // is missing; distinguish so callers get the right error.
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM user_progression WHERE user_id = $1)",
            )
            .bind(user_id.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::persistence(format!("Database error: {}", e)))?;

            if !exists {
                return Err(DomainError::user_not_found(user_id));
            }
            return Ok(ClaimOutcome::AlreadyClaimed);
        }

        Ok(ClaimOutcome::Claimed)
    }
}
