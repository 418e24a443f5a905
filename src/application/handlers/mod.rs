//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod progression;

pub use progression::{
    AwardStreakMilestonesCommand, AwardStreakMilestonesHandler, AwardStreakMilestonesResult,
    ContributionDaySample, GetProgressHandler, GetProgressQuery, GrantXpCommand, GrantXpHandler,
    GrantXpResult, RecordDailyLoginCommand, RecordDailyLoginHandler, RecordDailyLoginResult,
    SyncContributionsCommand, SyncContributionsHandler, SyncContributionsResult,
};
