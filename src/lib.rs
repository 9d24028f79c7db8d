//! Progression - XP, levels, badges and daily streaks for learners
//!
//! The [`engine`] module holds the pure rules that turn learner
//! activity (lesson completions, daily logins) into experience points, levels,
//! badges and streak counters. It owns no storage and reads no clock; the host
//! passes a [`ProgressionState`] and today's date into every call.
//!
//! The remaining modules are the host used by the `progression` binary:
//!
//! 1. **config**: TOML configuration (`~/.progression/config.toml`).
//! 2. **store**: per-learner JSON files with one exclusive lock per learner,
//!    which gives the engine its single writer.
//!
//! ```
//! use chrono::NaiveDate;
//! use progression::{LessonEvent, ProgressionEngine};
//!
//! let engine = ProgressionEngine::standard();
//! let mut state = engine.new_state();
//! let today = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();
//!
//! let result = engine
//!     .record_lesson_completion(&mut state, &LessonEvent::new().with_accuracy(1.0).fast(), today)
//!     .unwrap();
//! assert_eq!(result.points_earned, 180);
//! assert_eq!(result.newly_unlocked_badges[0].id, "first_step");
//! ```

mod atomic_io;
pub mod config;
pub mod engine;
pub mod error;
pub mod store;

pub use engine::*;
pub use error::ProgressionError;
