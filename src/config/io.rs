//! Configuration file I/O operations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::EngineConfig;
use crate::atomic_io::{lock_exclusive, write_atomic};

/// Commented default configuration written by `progression init`
pub const DEFAULT_CONFIG: &str = r#"# Progression engine configuration
# ================================

# XP awarded per completed lesson:
#   base_points        - XP for any completed lesson
#   accuracy_bonus_max - bonus at 100% accuracy (scaled linearly, rounded)
#   speed_bonus        - bonus for a fast completion
[scoring]
base_points = 100
accuracy_bonus_max = 50
speed_bonus = 30

# Streak badges (7 and 30 days):
#   "exact"     - unlock only on the day the streak equals the milestone
#   "threshold" - unlock the first time the streak is at or above it
[streaks]
milestone_policy = "exact"

# Calendar used for "today" when --date is not given: "utc" or "local"
[clock]
reference = "utc"

# Optional replacement level table. Ranges must be contiguous, start at 0,
# and only the last level may omit max_xp.
#
# [[levels]]
# level = 1
# name = "Novice"
# min_xp = 0
# max_xp = 500
"#;

impl EngineConfig {
    /// Get the global config directory path (~/.progression/)
    pub fn global_config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".progression")
    }

    /// Get the global config file path (~/.progression/config.toml)
    pub fn global_config_path() -> PathBuf {
        Self::global_config_dir().join("config.toml")
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: EngineConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load `path` (or the global config), falling back to defaults when it does not exist
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::global_config_path);

        if !path.exists() {
            tracing::warn!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let config = Self::from_file(&path)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a file with atomic write and file locking
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;
        write_locked(path, &content)
    }
}

/// Write the commented default config to `path`
pub fn write_default_config(path: &Path) -> Result<()> {
    write_locked(path, DEFAULT_CONFIG)
}

fn write_locked(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create config directory: {}", parent.display())
        })?;
    }

    // Lock file is separate from the config so the rename cannot break it
    let _lock = lock_exclusive(&path.with_extension("toml.lock"))?;
    write_atomic(path, content.as_bytes())
}
