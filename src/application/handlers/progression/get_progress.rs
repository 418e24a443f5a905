//! GetProgress - query handler for the level-progress display.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::progression::{progress_for_xp, LevelProgress};
use crate::ports::ProgressionRepository;

/// Query for a user's position on the level curve.
#[derive(Debug, Clone)]
pub struct GetProgressQuery {
    pub user_id: UserId,
}

/// Handler for reading level progress.
pub struct GetProgressHandler {
    progression: Arc<dyn ProgressionRepository>,
}

impl GetProgressHandler {
    pub fn new(progression: Arc<dyn ProgressionRepository>) -> Self {
        Self { progression }
    }

    pub async fn handle(
        &self,
        query: GetProgressQuery,
    ) -> Result<Option<LevelProgress>, DomainError> {
        let aggregate = self.progression.find_by_user(&query.user_id).await?;
        Ok(aggregate.map(|agg| progress_for_xp(agg.total_xp())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryProgressionRepository;
    use crate::ports::ProgressionRepository as _;

    fn test_user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    #[tokio::test]
    async fn progress_reflects_stored_totals() {
        let progression = Arc::new(InMemoryProgressionRepository::new());
        progression.seed_user(&test_user()).await;
        progression.update_totals(&test_user(), 250, 2).await.unwrap();

        let handler = GetProgressHandler::new(progression);
        let progress = handler
            .handle(GetProgressQuery {
                user_id: test_user(),
            })
            .await
            .unwrap()
            .expect("progress expected");

        assert_eq!(progress.level, 2);
        assert_eq!(progress.xp_at_level_start, 100);
        assert_eq!(progress.percent.value(), 50);
    }

    #[tokio::test]
    async fn unknown_user_yields_none() {
        let progression = Arc::new(InMemoryProgressionRepository::new());
        let handler = GetProgressHandler::new(progression);

        let progress = handler
            .handle(GetProgressQuery {
                user_id: test_user(),
            })
            .await
            .unwrap();

        assert!(progress.is_none());
    }
}
