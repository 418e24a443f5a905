//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Each grant policy is a command handler; reads go through query handlers.

pub mod handlers;

pub use handlers::{
    AwardStreakMilestonesCommand, AwardStreakMilestonesHandler, AwardStreakMilestonesResult,
    GetProgressHandler, GetProgressQuery, GrantXpCommand, GrantXpHandler, GrantXpResult,
    RecordDailyLoginCommand, RecordDailyLoginHandler, RecordDailyLoginResult,
    SyncContributionsCommand, SyncContributionsHandler, SyncContributionsResult,
    ContributionDaySample,
};
