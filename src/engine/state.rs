//! Per-learner progression state

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::definitions::BadgeCatalog;
use super::levels::LevelTable;
use crate::error::{ProgressionError, Result};

/// The only mutable entity: one instance per learner, owned by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionState {
    pub(crate) xp: u64,
    /// Cache of `levels.lookup(xp).level`
    pub(crate) level: u32,
    /// Earned badge ids in earn order
    #[serde(default)]
    pub(crate) earned_badges: Vec<String>,
    #[serde(default)]
    pub(crate) streak_days: u32,
    #[serde(default)]
    pub(crate) longest_streak: u32,
    #[serde(default)]
    pub(crate) last_activity_date: Option<NaiveDate>,
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressionState {
    /// Fresh learner: no XP, first level, no badges, no streak
    pub fn new() -> Self {
        Self {
            xp: 0,
            level: 1,
            earned_badges: Vec::new(),
            streak_days: 0,
            longest_streak: 0,
            last_activity_date: None,
        }
    }

    /// Fresh learner whose starting level comes from `levels`
    pub fn for_table(levels: &LevelTable) -> Self {
        Self {
            level: levels.lookup(0).level,
            ..Self::new()
        }
    }

    /// Rebuild a state from stored values, checking every invariant
    ///
    /// The level cache is recomputed from `xp`.
    pub fn restore(
        xp: u64,
        earned_badges: Vec<String>,
        streak_days: u32,
        longest_streak: u32,
        last_activity_date: Option<NaiveDate>,
        levels: &LevelTable,
        catalog: &BadgeCatalog,
    ) -> Result<Self> {
        let mut state = Self {
            xp,
            level: 0,
            earned_badges,
            streak_days,
            longest_streak,
            last_activity_date,
        };
        state.revalidate(levels, catalog)?;
        Ok(state)
    }

    /// Re-check invariants of a deserialized state and refresh the level cache
    pub fn revalidate(&mut self, levels: &LevelTable, catalog: &BadgeCatalog) -> Result<()> {
        if (self.streak_days == 0) != self.last_activity_date.is_none() {
            return Err(ProgressionError::Configuration(format!(
                "streak of {} days inconsistent with last activity {:?}",
                self.streak_days, self.last_activity_date
            )));
        }
        if self.longest_streak < self.streak_days {
            return Err(ProgressionError::Configuration(format!(
                "longest streak {} below current streak {}",
                self.longest_streak, self.streak_days
            )));
        }
        for (i, id) in self.earned_badges.iter().enumerate() {
            if !catalog.contains(id) {
                return Err(ProgressionError::Configuration(format!(
                    "earned badge '{id}' is not in the catalog"
                )));
            }
            if self.earned_badges[..i].contains(id) {
                return Err(ProgressionError::Configuration(format!(
                    "badge '{id}' recorded twice"
                )));
            }
        }

        let level = levels.lookup(self.xp).level;
        if level != self.level {
            tracing::debug!(
                "Refreshing stale level cache {} -> {} for {} XP",
                self.level,
                level,
                self.xp
            );
            self.level = level;
        }
        Ok(())
    }

    pub fn xp(&self) -> u64 {
        self.xp
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn earned_badges(&self) -> &[String] {
        &self.earned_badges
    }

    pub fn has_badge(&self, id: &str) -> bool {
        self.earned_badges.iter().any(|b| b == id)
    }

    pub fn streak_days(&self) -> u32 {
        self.streak_days
    }

    pub fn longest_streak(&self) -> u32 {
        self.longest_streak
    }

    pub fn last_activity_date(&self) -> Option<NaiveDate> {
        self.last_activity_date
    }
}
