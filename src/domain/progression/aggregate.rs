//! UserProgression aggregate - derived XP totals for a user.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId};

use super::level_curve::level_for_xp;

/// Result of applying an XP gain to the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpGain {
    pub xp_gained: i64,
    pub new_xp: i64,
    pub new_level: u32,
    pub leveled_up: bool,
}

/// Per-user progression totals, derived from the XP event log.
///
/// Invariant: `level == level_for_xp(total_xp)` after every update, and
/// `total_xp` never goes below zero. The aggregate is an incremental fold of
/// the user's events; the event log stays authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProgression {
    user_id: UserId,
    total_xp: i64,
    level: u32,
    updated_at: Timestamp,
}

impl UserProgression {
    /// Creates a fresh aggregate for a new user (0 XP, level 1).
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            total_xp: 0,
            level: level_for_xp(0),
            updated_at: Timestamp::now(),
        }
    }

    /// Reconstructs an aggregate from stored fields, rederiving the level so
    /// the invariant holds even if the stored columns drifted.
    pub fn from_parts(user_id: UserId, total_xp: i64, updated_at: Timestamp) -> Self {
        let total_xp = total_xp.max(0);
        Self {
            user_id,
            total_xp,
            level: level_for_xp(total_xp),
            updated_at,
        }
    }

    /// Applies a signed XP delta, flooring the total at zero and rederiving
    /// the level.
    pub fn apply_gain(&mut self, amount: i64, now: Timestamp) -> XpGain {
        let previous_level = self.level;
        let new_xp = self.total_xp.saturating_add(amount).max(0);
        let xp_gained = new_xp - self.total_xp;

        self.total_xp = new_xp;
        self.level = level_for_xp(new_xp);
        self.updated_at = now;

        XpGain {
            xp_gained,
            new_xp,
            new_level: self.level,
            leveled_up: self.level > previous_level,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn total_xp(&self) -> i64 {
        self.total_xp
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}
