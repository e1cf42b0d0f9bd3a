//! The per-question scoring model
//!
//! Scoring is a pure function of the time left on the clock, the round's
//! per-question time budget, and the streak going into the answer. It has
//! no side effects and no dependency on presentation, so it can be tested
//! in isolation.

use serde::{Deserialize, Serialize};

use super::constants::round::{BASE_POINTS, MAX_STREAK_BONUS, MAX_TIME_BONUS, STREAK_BONUS_STEP};

/// The additive components of the points awarded for one correct answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Points {
    /// Flat award for answering correctly
    pub base: u32,
    /// Bonus proportional to the time left on the clock (at least 1)
    pub time_bonus: u32,
    /// Bonus for the streak going into this answer (capped)
    pub streak_bonus: u32,
}

impl Points {
    /// Returns the total points awarded
    pub fn total(self) -> u32 {
        self.base + self.time_bonus + self.streak_bonus
    }
}

/// Computes the time bonus for a correct answer.
///
/// Scales linearly with the fraction of the time budget left, floored, but
/// never below 1: a correct answer at the buzzer still earns something.
///
/// # Panics
///
/// Panics in debug builds if `time_limit` is zero; the round machine never
/// arms a zero-second budget.
pub fn time_bonus(time_remaining: u32, time_limit: u32) -> u32 {
    debug_assert!(time_limit > 0, "time limit must be positive");
    (time_remaining * MAX_TIME_BONUS / time_limit).max(1)
}

/// Computes the streak bonus from the streak *before* this answer
pub fn streak_bonus(streak_before: u32) -> u32 {
    (streak_before * STREAK_BONUS_STEP).min(MAX_STREAK_BONUS)
}

/// Computes the full points breakdown for one correct answer
pub fn question_points(time_remaining: u32, time_limit: u32, streak_before: u32) -> Points {
    Points {
        base: BASE_POINTS,
        time_bonus: time_bonus(time_remaining, time_limit),
        streak_bonus: streak_bonus(streak_before),
    }
}
