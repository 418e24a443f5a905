//! Level curve - pure mapping between cumulative XP and level.
//!
//! The curve is quadratic: reaching level `L` requires `(L-1)^2 * 100` XP,
//! so thresholds land on perfect squares and `level_for_xp` /
//! `xp_threshold_for_level` are exact inverses for every level in range.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Percentage;

/// XP scale factor of the quadratic curve.
pub const XP_PER_LEVEL_BASE: i64 = 100;

/// Highest attainable level.
pub const MAX_LEVEL: u32 = 100;

/// Integer square root (largest `r` with `r * r <= n`).
fn isqrt(n: i64) -> i64 {
    if n <= 0 {
        return 0;
    }
    let mut r = (n as f64).sqrt() as i64;
    while r * r > n {
        r -= 1;
    }
    while (r + 1) * (r + 1) <= n {
        r += 1;
    }
    r
}

/// Returns the level for a cumulative XP total.
///
/// Any non-positive total maps to level 1 (a guard against corrupt data,
/// not an error). The result is clamped to `[1, MAX_LEVEL]`.
pub fn level_for_xp(xp: i64) -> u32 {
    if xp <= 0 {
        return 1;
    }
    let level = isqrt(xp / XP_PER_LEVEL_BASE) + 1;
    (level as u32).clamp(1, MAX_LEVEL)
}

/// Returns the cumulative XP required to reach `level`.
///
/// Level 1 (and below) starts at 0. Levels above `MAX_LEVEL` are
/// unreachable, modeled as `None`.
pub fn xp_threshold_for_level(level: u32) -> Option<i64> {
    if level <= 1 {
        return Some(0);
    }
    if level > MAX_LEVEL {
        return None;
    }
    let prior = (level - 1) as i64;
    Some(prior * prior * XP_PER_LEVEL_BASE)
}

/// Snapshot of a user's position on the level curve, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub level: u32,
    pub xp_at_level_start: i64,
    /// XP threshold of the next level; `None` at `MAX_LEVEL`.
    pub xp_at_next_level: Option<i64>,
    pub xp_into_level: i64,
    /// XP remaining to the next level; 0 at `MAX_LEVEL`.
    pub xp_to_next: i64,
    pub percent: Percentage,
}

/// Derives the full progress snapshot for a cumulative XP total.
pub fn progress_for_xp(xp: i64) -> LevelProgress {
    let xp = xp.max(0);
    let level = level_for_xp(xp);
    // level is in [1, MAX_LEVEL], so its own threshold always exists.
    let xp_at_level_start = xp_threshold_for_level(level).unwrap_or(0);
    let xp_at_next_level = xp_threshold_for_level(level + 1);
    let xp_into_level = xp - xp_at_level_start;

    match xp_at_next_level {
        Some(next) => {
            let span = next - xp_at_level_start;
            LevelProgress {
                level,
                xp_at_level_start,
                xp_at_next_level,
                xp_into_level,
                xp_to_next: (next - xp).max(0),
                percent: Percentage::from_ratio(xp_into_level, span),
            }
        }
        None => LevelProgress {
            level,
            xp_at_level_start,
            xp_at_next_level: None,
            xp_into_level,
            xp_to_next: 0,
            percent: Percentage::HUNDRED,
        },
    }
}
