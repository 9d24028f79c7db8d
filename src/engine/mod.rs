//! Gamification engine: XP, Levels, Streaks, and Badges
//!
//! Pure rules over a caller-owned [`ProgressionState`]; no I/O and no clock.

mod checker;
mod context;
mod definitions;
mod ledger;
mod levels;
mod manager;
mod state;
mod streaks;

pub use context::{EvaluationContext, MilestonePolicy};
pub use definitions::{
    BADGES, BadgeCatalog, BadgeCategory, BadgeDefinition, BadgeIds, BadgePredicate,
    LESSON_BADGES, STREAK_MILESTONES, lesson_badge,
};
pub use ledger::{ScoringRules, XpAward};
pub use levels::{
    LevelTable, LevelThreshold, STANDARD_LEVELS, level_progress_percent, standard_tiers,
};
pub use manager::{LessonEvent, LessonResult, LoginResult, ProgressionEngine};
pub use state::ProgressionState;
pub use streaks::{StreakTransition, StreakUpdate};
