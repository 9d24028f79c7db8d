//! XP ledger: cumulative experience points and the derived level

use serde::{Deserialize, Serialize};

use super::levels::LevelTable;
use super::state::ProgressionState;
use crate::error::{ProgressionError, Result};

/// XP rewards for a lesson completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    /// XP for completing any lesson
    pub base_points: u32,
    /// Bonus at 100% accuracy, scaled linearly and rounded
    pub accuracy_bonus_max: u32,
    /// Bonus for a fast completion
    pub speed_bonus: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            base_points: 100,
            accuracy_bonus_max: 50,
            speed_bonus: 30,
        }
    }
}

impl ScoringRules {
    /// Bonus for `accuracy` in `[0, 1]`
    pub fn accuracy_bonus(&self, accuracy: Option<f64>) -> Result<u64> {
        let Some(accuracy) = accuracy else {
            return Ok(0);
        };
        if !accuracy.is_finite() || !(0.0..=1.0).contains(&accuracy) {
            return Err(ProgressionError::InvalidArgument(format!(
                "accuracy must be within [0, 1], got {accuracy}"
            )));
        }
        Ok((accuracy * f64::from(self.accuracy_bonus_max)).round() as u64)
    }

    pub fn speed_bonus(&self, fast_completion: bool) -> u64 {
        if fast_completion {
            u64::from(self.speed_bonus)
        } else {
            0
        }
    }

    /// Total points for one lesson completion
    pub fn lesson_points(&self, accuracy: Option<f64>, fast_completion: bool) -> Result<u64> {
        Ok(u64::from(self.base_points)
            + self.accuracy_bonus(accuracy)?
            + self.speed_bonus(fast_completion))
    }
}

/// Outcome of an XP award
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpAward {
    pub new_xp: u64,
    pub leveled_up: bool,
    pub previous_level: u32,
    pub new_level: u32,
}

/// Check that `points` can be added to `current` without mutating anything
pub fn validate_points(current: u64, points: i64) -> Result<u64> {
    let points = u64::try_from(points).map_err(|_| {
        ProgressionError::InvalidArgument(format!("XP points must be >= 0, got {points}"))
    })?;
    current.checked_add(points).ok_or_else(|| {
        ProgressionError::InvalidArgument(format!("adding {points} XP to {current} overflows"))
    })
}

/// Add `points` to the learner's XP and recompute the level
///
/// Negative points fail with `InvalidArgument` and leave the state untouched.
/// Both levels come from `levels`, never from the state's cached level.
pub fn add_xp(state: &mut ProgressionState, points: i64, levels: &LevelTable) -> Result<XpAward> {
    let new_xp = validate_points(state.xp, points)?;
    let previous_level = levels.lookup(state.xp).level;
    let new_level = levels.lookup(new_xp).level;

    state.xp = new_xp;
    state.level = new_level;

    Ok(XpAward {
        new_xp,
        leveled_up: new_level != previous_level,
        previous_level,
        new_level,
    })
}
