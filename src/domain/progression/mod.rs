//! Progression module - XP events, the level curve, and the user aggregate.
//!
//! The progression ledger is append-only: `XpEvent` records are written once
//! and never mutated, and `UserProgression` is the derived aggregate kept in
//! lockstep with the event log. The level curve and reward tables are pure.

mod aggregate;
mod event;
mod grant_date;
mod level_curve;
mod rewards;

pub use aggregate::{UserProgression, XpGain};
pub use event::{XpEvent, XpEventKind, XpEventType};
pub use grant_date::GrantDate;
pub use level_curve::{
    level_for_xp, progress_for_xp, xp_threshold_for_level, LevelProgress, MAX_LEVEL,
    XP_PER_LEVEL_BASE,
};
pub use rewards::{
    bounty_win_bonus, StreakMilestone, BASE_WIN_XP, CONTRIBUTION_DAY_XP, DAILY_LOGIN_XP,
    PROFILE_COMPLETION_XP, STREAK_MILESTONES,
};
