//! SyncContributions - grant XP for new GitHub contribution days.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::progression::{GrantDate, XpEventKind, CONTRIBUTION_DAY_XP};
use crate::ports::XpEventStore;

use super::grant_xp::{GrantXpCommand, GrantXpHandler};

/// One day of a user's contribution calendar, as fetched from GitHub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContributionDaySample {
    pub date: GrantDate,
    pub count: u32,
}

/// Command to sync a contribution calendar into XP grants.
#[derive(Debug, Clone)]
pub struct SyncContributionsCommand {
    pub user_id: UserId,
    pub calendar: Vec<ContributionDaySample>,
    /// Upper bound of the scan, normally `GrantDate::today()`.
    pub today: GrantDate,
}

/// Result of a contribution sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncContributionsResult {
    pub granted_dates: Vec<GrantDate>,
    pub xp_gained: i64,
}

/// Handler for the contribution-day policy.
///
/// Grants one fixed-size event per calendar day with `count > 0` strictly
/// after the most recent previously granted contribution date. When the user
/// has no grant history the scan is bounded by a lookback window, so linking
/// an account with years of activity does not produce a retroactive XP
/// windfall. The window length is a deployment decision, injected rather
/// than hard-coded.
pub struct SyncContributionsHandler {
    events: Arc<dyn XpEventStore>,
    grant: Arc<GrantXpHandler>,
    lookback_days: u32,
}

impl SyncContributionsHandler {
    pub fn new(
        events: Arc<dyn XpEventStore>,
        grant: Arc<GrantXpHandler>,
        lookback_days: u32,
    ) -> Self {
        Self {
            events,
            grant,
            lookback_days,
        }
    }

    pub async fn handle(
        &self,
        cmd: SyncContributionsCommand,
    ) -> Result<SyncContributionsResult, DomainError> {
        // Everything at or before the cutoff is out of scope for granting.
        let cutoff = match self.events.latest_contribution_date(&cmd.user_id).await? {
            Some(latest) => latest,
            None => cmd.today.minus_days(self.lookback_days as u64),
        };

        let mut eligible: Vec<GrantDate> = cmd
            .calendar
            .iter()
            .filter(|day| day.count > 0 && day.date > cutoff && day.date <= cmd.today)
            .map(|day| day.date)
            .collect();
        eligible.sort();
        eligible.dedup();

        let mut granted_dates = Vec::new();
        let mut xp_gained = 0;
        for date in eligible {
            let result = self
                .grant
                .handle(GrantXpCommand {
                    user_id: cmd.user_id.clone(),
                    kind: XpEventKind::ContributionDay { date },
                    amount: CONTRIBUTION_DAY_XP,
                })
                .await?;
            // A duplicate here means a concurrent sync beat us to this day.
            if result.xp_gained > 0 {
                granted_dates.push(date);
                xp_gained += result.xp_gained;
            }
        }

        tracing::debug!(
            user_id = %cmd.user_id,
            granted = granted_dates.len(),
            xp_gained,
            "Contribution sync complete"
        );

        Ok(SyncContributionsResult {
            granted_dates,
            xp_gained,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryProgressionRepository, InMemoryXpEventStore};

    const LOOKBACK: u32 = 30;

    fn test_user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    fn day(offset_from: GrantDate, days_back: u64, count: u32) -> ContributionDaySample {
        ContributionDaySample {
            date: offset_from.minus_days(days_back),
            count,
        }
    }

    async fn handler() -> (SyncContributionsHandler, Arc<InMemoryXpEventStore>) {
        let events = Arc::new(InMemoryXpEventStore::new());
        let progression = Arc::new(InMemoryProgressionRepository::new());
        progression.seed_user(&test_user()).await;
        let grant = Arc::new(GrantXpHandler::new(events.clone(), progression));
        (
            SyncContributionsHandler::new(events.clone(), grant, LOOKBACK),
            events,
        )
    }

    #[tokio::test]
    async fn grants_each_recent_active_day_without_history() {
        let (handler, events) = handler().await;
        let today = GrantDate::from_ymd(2024, 6, 10).unwrap();

        let result = handler
            .handle(SyncContributionsCommand {
                user_id: test_user(),
                calendar: vec![day(today, 2, 3), day(today, 1, 1), day(today, 0, 5)],
                today,
            })
            .await
            .unwrap();

        assert_eq!(result.granted_dates.len(), 3);
        assert_eq!(result.xp_gained, 3 * CONTRIBUTION_DAY_XP);
        assert_eq!(events.event_count().await, 3);
    }

    #[tokio::test]
    async fn skips_zero_count_days() {
        let (handler, _) = handler().await;
        let today = GrantDate::from_ymd(2024, 6, 10).unwrap();

        let result = handler
            .handle(SyncContributionsCommand {
                user_id: test_user(),
                calendar: vec![day(today, 1, 0), day(today, 0, 2)],
                today,
            })
            .await
            .unwrap();

        assert_eq!(result.granted_dates, vec![today]);
    }

    #[tokio::test]
    async fn lookback_window_bounds_first_sync() {
        let (handler, _) = handler().await;
        let today = GrantDate::from_ymd(2024, 6, 10).unwrap();

        // One day inside the window, one outside.
        let result = handler
            .handle(SyncContributionsCommand {
                user_id: test_user(),
                calendar: vec![
                    day(today, (LOOKBACK as u64) + 10, 4),
                    day(today, 5, 2),
                ],
                today,
            })
            .await
            .unwrap();

        assert_eq!(result.granted_dates, vec![today.minus_days(5)]);
    }

    #[tokio::test]
    async fn resumes_strictly_after_latest_prior_grant() {
        let (handler, events) = handler().await;
        let today = GrantDate::from_ymd(2024, 6, 10).unwrap();

        handler
            .handle(SyncContributionsCommand {
                user_id: test_user(),
                calendar: vec![day(today, 3, 1)],
                today,
            })
            .await
            .unwrap();

        // Re-sync with the same calendar plus newer days: only the newer
        // days are granted, even though day-4 is inside the lookback window.
        let result = handler
            .handle(SyncContributionsCommand {
                user_id: test_user(),
                calendar: vec![
                    day(today, 4, 2),
                    day(today, 3, 1),
                    day(today, 1, 1),
                    day(today, 0, 1),
                ],
                today,
            })
            .await
            .unwrap();

        assert_eq!(
            result.granted_dates,
            vec![today.minus_days(1), today]
        );
        assert_eq!(events.event_count().await, 3);
    }

    #[tokio::test]
    async fn rerunning_the_same_calendar_grants_nothing() {
        let (handler, events) = handler().await;
        let today = GrantDate::from_ymd(2024, 6, 10).unwrap();
        let calendar = vec![day(today, 1, 2), day(today, 0, 2)];

        handler
            .handle(SyncContributionsCommand {
                user_id: test_user(),
                calendar: calendar.clone(),
                today,
            })
            .await
            .unwrap();
        let second = handler
            .handle(SyncContributionsCommand {
                user_id: test_user(),
                calendar,
                today,
            })
            .await
            .unwrap();

        assert!(second.granted_dates.is_empty());
        assert_eq!(second.xp_gained, 0);
        assert_eq!(events.event_count().await, 2);
    }

    #[tokio::test]
    async fn future_dates_are_ignored() {
        let (handler, _) = handler().await;
        let today = GrantDate::from_ymd(2024, 6, 10).unwrap();

        let result = handler
            .handle(SyncContributionsCommand {
                user_id: test_user(),
                calendar: vec![ContributionDaySample {
                    date: today.plus_days(1),
                    count: 1,
                }],
                today,
            })
            .await
            .unwrap();

        assert!(result.granted_dates.is_empty());
    }
}
