//! Reward tables - fixed XP amounts for each grant policy.

use serde::{Deserialize, Serialize};

/// XP for the first login of a calendar day.
pub const DAILY_LOGIN_XP: i64 = 10;

/// XP for each GitHub contribution day.
pub const CONTRIBUTION_DAY_XP: i64 = 15;

/// XP for completing the developer profile.
pub const PROFILE_COMPLETION_XP: i64 = 50;

/// Flat component of the bounty-win bonus.
pub const BASE_WIN_XP: i64 = 100;

/// A streak length with its one-time XP reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakMilestone {
    pub days: u32,
    pub xp: i64,
}

/// One-time streak rewards, ascending by length. Each is granted at most
/// once per user, ever.
///
/// | Streak | XP |
/// |--------|------|
/// | 3 | 25 |
/// | 7 | 50 |
/// | 14 | 100 |
/// | 30 | 250 |
/// | 60 | 400 |
/// | 90 | 600 |
/// | 180 | 1000 |
/// | 365 | 2000 |
pub const STREAK_MILESTONES: &[StreakMilestone] = &[
    StreakMilestone { days: 3, xp: 25 },
    StreakMilestone { days: 7, xp: 50 },
    StreakMilestone { days: 14, xp: 100 },
    StreakMilestone { days: 30, xp: 250 },
    StreakMilestone { days: 60, xp: 400 },
    StreakMilestone { days: 90, xp: 600 },
    StreakMilestone { days: 180, xp: 1000 },
    StreakMilestone { days: 365, xp: 2000 },
];

/// XP bonus for winning a bounty of the given value.
///
/// Pure function; the caller passes the result as the grant amount.
pub fn bounty_win_bonus(bounty_value: i64) -> i64 {
    BASE_WIN_XP + bounty_value.max(0) / 10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn milestones_are_strictly_ascending() {
        for pair in STREAK_MILESTONES.windows(2) {
            assert!(pair[0].days < pair[1].days);
            assert!(pair[0].xp < pair[1].xp);
        }
    }

    #[test]
    fn bounty_win_bonus_scales_with_value() {
        assert_eq!(bounty_win_bonus(0), BASE_WIN_XP);
        assert_eq!(bounty_win_bonus(100), BASE_WIN_XP + 10);
        assert_eq!(bounty_win_bonus(255), BASE_WIN_XP + 25);
    }

    #[test]
    fn bounty_win_bonus_ignores_negative_values() {
        assert_eq!(bounty_win_bonus(-100), BASE_WIN_XP);
    }
}
