//! Progression handlers - the XP ledger operation and the grant policies.
//!
//! The policies decide *whether* a grant should occur; `GrantXpHandler`
//! decides *whether it takes effect* (idempotency via the event store's
//! uniqueness constraint). XP is supplementary to every action it rewards,
//! so callers are expected to log handler failures and carry on with the
//! primary workflow rather than abort it.

mod award_streak_milestones;
mod get_progress;
mod grant_xp;
mod record_daily_login;
mod sync_contributions;

pub use award_streak_milestones::{
    AwardStreakMilestonesCommand, AwardStreakMilestonesHandler, AwardStreakMilestonesResult,
};
pub use get_progress::{GetProgressHandler, GetProgressQuery};
pub use grant_xp::{GrantXpCommand, GrantXpHandler, GrantXpResult};
pub use record_daily_login::{
    RecordDailyLoginCommand, RecordDailyLoginHandler, RecordDailyLoginResult,
};
pub use sync_contributions::{
    ContributionDaySample, SyncContributionsCommand, SyncContributionsHandler,
    SyncContributionsResult,
};
