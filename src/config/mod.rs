//! Configuration loading and management

mod io;

pub use io::{DEFAULT_CONFIG, write_default_config};

use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::engine::{
    BadgeCatalog, LevelTable, LevelThreshold, MilestonePolicy, ProgressionEngine, ScoringRules,
};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// XP awarded per lesson
    #[serde(default)]
    pub scoring: ScoringRules,

    /// Streak milestone matching
    #[serde(default)]
    pub streaks: StreakSettings,

    /// Which calendar "today" comes from
    #[serde(default)]
    pub clock: ClockSettings,

    /// Replacement level table (standard tiers when empty)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub levels: Vec<LevelThreshold>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreakSettings {
    pub milestone_policy: MilestonePolicy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockSettings {
    pub reference: ClockReference,
}

/// Time zone used to turn "now" into a calendar date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockReference {
    #[default]
    Utc,
    Local,
}

impl ClockReference {
    /// Today's date in this reference
    pub fn today(&self) -> NaiveDate {
        match self {
            Self::Utc => Utc::now().date_naive(),
            Self::Local => Local::now().date_naive(),
        }
    }
}

impl EngineConfig {
    /// Level table from the config, or the standard one
    pub fn level_table(&self) -> Result<LevelTable> {
        if self.levels.is_empty() {
            Ok(LevelTable::standard())
        } else {
            LevelTable::new(self.levels.clone())
        }
    }

    /// Validate the configuration and build the engine
    pub fn build_engine(&self) -> Result<ProgressionEngine> {
        ProgressionEngine::new(
            self.level_table()?,
            BadgeCatalog::standard(),
            self.scoring,
            self.streaks.milestone_policy,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProgressionError;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            [scoring]
            speed_bonus = 45

            [streaks]
            milestone_policy = "threshold"
            "#,
        )
        .unwrap();

        assert_eq!(config.scoring.base_points, 100);
        assert_eq!(config.scoring.accuracy_bonus_max, 50);
        assert_eq!(config.scoring.speed_bonus, 45);
        assert_eq!(config.streaks.milestone_policy, MilestonePolicy::Threshold);
        assert_eq!(config.clock.reference, ClockReference::Utc);
        assert!(config.levels.is_empty());
    }

    #[test]
    fn test_negative_bonus_rejected_at_parse() {
        let result: std::result::Result<EngineConfig, _> = toml::from_str(
            r#"
            [scoring]
            speed_bonus = -5
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_custom_levels() {
        let config: EngineConfig = toml::from_str(
            r#"
            [[levels]]
            level = 1
            name = "Seed"
            min_xp = 0
            max_xp = 99

            [[levels]]
            level = 2
            name = "Tree"
            min_xp = 100
            "#,
        )
        .unwrap();

        let engine = config.build_engine().unwrap();
        assert_eq!(engine.levels().lookup(150).name, "Tree");
    }

    #[test]
    fn test_broken_levels_fail_at_build() {
        let config: EngineConfig = toml::from_str(
            r#"
            [[levels]]
            level = 1
            name = "Seed"
            min_xp = 0
            max_xp = 99
            "#,
        )
        .unwrap();

        assert!(matches!(
            config.build_engine(),
            Err(ProgressionError::Configuration(_))
        ));
    }

    #[test]
    fn test_default_config_text_parses_to_defaults() {
        let config: EngineConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, EngineConfig::default());
    }
}
