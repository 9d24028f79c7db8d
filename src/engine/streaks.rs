//! Streak tracking system
//!
//! Tracks consecutive calendar days with at least one activity. Dates are
//! compared as calendar dates only, never as timestamps.

use chrono::NaiveDate;

use super::state::ProgressionState;

/// Which day-boundary rule applied on a touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakTransition {
    /// First activity ever
    Started,
    /// Already counted today
    SameDay,
    /// Activity on the day after the last one
    Extended,
    /// Gap of two or more days, or a date before the last activity
    Reset,
}

impl StreakTransition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::SameDay => "same_day",
            Self::Extended => "extended",
            Self::Reset => "reset",
        }
    }
}

/// Outcome of a streak touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    pub streak_days: u32,
    pub streak_changed: bool,
    pub transition: StreakTransition,
}

/// Classify `today` against the last activity date
pub fn transition_for(last_activity: Option<NaiveDate>, today: NaiveDate) -> StreakTransition {
    let Some(last) = last_activity else {
        return StreakTransition::Started;
    };

    if today == last {
        StreakTransition::SameDay
    } else if last.succ_opt() == Some(today) {
        StreakTransition::Extended
    } else {
        StreakTransition::Reset
    }
}

/// Record activity on `today`
///
/// Calling this twice on the same day leaves the streak unchanged after the first call.
pub fn touch(state: &mut ProgressionState, today: NaiveDate) -> StreakUpdate {
    let transition = transition_for(state.last_activity_date, today);

    match transition {
        StreakTransition::SameDay => {
            return StreakUpdate {
                streak_days: state.streak_days,
                streak_changed: false,
                transition,
            };
        }
        StreakTransition::Started | StreakTransition::Reset => state.streak_days = 1,
        StreakTransition::Extended => state.streak_days = state.streak_days.saturating_add(1),
    }

    state.last_activity_date = Some(today);
    state.longest_streak = state.longest_streak.max(state.streak_days);

    StreakUpdate {
        streak_days: state.streak_days,
        streak_changed: true,
        transition,
    }
}

/// Whether the streak is still alive on `today` (activity today or yesterday)
pub fn is_active(state: &ProgressionState, today: NaiveDate) -> bool {
    matches!(
        transition_for(state.last_activity_date, today),
        StreakTransition::SameDay | StreakTransition::Extended
    )
}
