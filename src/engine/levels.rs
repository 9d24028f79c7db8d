//! XP and Level system
//!
//! Defines level thresholds, titles, and the lookup from XP to level.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{ProgressionError, Result};

/// Level definition: the XP range `[min_xp, max_xp]` mapped to a named level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelThreshold {
    pub level: u32,
    pub name: String,
    pub min_xp: u64,
    /// Upper bound (inclusive). `None` for the unbounded top tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_xp: Option<u64>,
}

impl LevelThreshold {
    pub fn new(level: u32, name: &str, min_xp: u64, max_xp: Option<u64>) -> Self {
        Self {
            level,
            name: name.to_string(),
            min_xp,
            max_xp,
        }
    }
}

/// The five standard tiers
pub fn standard_tiers() -> Vec<LevelThreshold> {
    vec![
        LevelThreshold::new(1, "Novice", 0, Some(500)),
        LevelThreshold::new(2, "Apprentice", 501, Some(1500)),
        LevelThreshold::new(3, "Developer", 1501, Some(3000)),
        LevelThreshold::new(4, "Artisan", 3001, Some(5000)),
        LevelThreshold::new(5, "Master", 5001, None),
    ]
}

/// Standard level table, validated once on first use
pub static STANDARD_LEVELS: Lazy<LevelTable> = Lazy::new(|| {
    LevelTable::new(standard_tiers()).expect("standard tiers cover [0, inf)")
});

/// Ordered, contiguous list of level thresholds covering `[0, +inf)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTable {
    tiers: Vec<LevelThreshold>,
}

impl LevelTable {
    /// Build a table, rejecting anything that does not cover `[0, +inf)` exactly once
    pub fn new(tiers: Vec<LevelThreshold>) -> Result<Self> {
        let Some(first) = tiers.first() else {
            return Err(config_error("level table is empty"));
        };
        if first.min_xp != 0 {
            return Err(config_error(format!(
                "first level '{}' must start at 0 XP, starts at {}",
                first.name, first.min_xp
            )));
        }

        let last_index = tiers.len() - 1;
        for (i, tier) in tiers.iter().enumerate() {
            match tier.max_xp {
                None if i != last_index => {
                    return Err(config_error(format!(
                        "only the last level may be unbounded, '{}' is not last",
                        tier.name
                    )));
                }
                Some(_) if i == last_index => {
                    return Err(config_error(format!(
                        "last level '{}' must be unbounded",
                        tier.name
                    )));
                }
                Some(max) if max < tier.min_xp => {
                    return Err(config_error(format!(
                        "level '{}' has max_xp {} below min_xp {}",
                        tier.name, max, tier.min_xp
                    )));
                }
                _ => {}
            }

            if let Some(next) = tiers.get(i + 1) {
                // max_xp is Some here: only the last tier is unbounded
                let expected = tier.max_xp.and_then(|max| max.checked_add(1));
                if expected != Some(next.min_xp) {
                    return Err(config_error(format!(
                        "level '{}' must start right after '{}' (gap or overlap at {} XP)",
                        next.name, tier.name, next.min_xp
                    )));
                }
                if next.level <= tier.level {
                    return Err(config_error(format!(
                        "level numbers must increase: {} follows {}",
                        next.level, tier.level
                    )));
                }
            }
        }

        Ok(Self { tiers })
    }

    /// The standard five-tier table
    pub fn standard() -> Self {
        STANDARD_LEVELS.clone()
    }

    pub fn tiers(&self) -> &[LevelThreshold] {
        &self.tiers
    }

    /// Tier containing `xp`. Total over `[0, +inf)`.
    pub fn lookup(&self, xp: u64) -> &LevelThreshold {
        self.tiers
            .iter()
            .rev()
            .find(|t| xp >= t.min_xp)
            .unwrap_or(&self.tiers[0])
    }

    /// Tier following `tier` (None at the top)
    pub fn next_tier(&self, tier: &LevelThreshold) -> Option<&LevelThreshold> {
        let pos = self.tiers.iter().position(|t| t.level == tier.level)?;
        self.tiers.get(pos + 1)
    }

    /// XP still needed to reach the next level (None at the top tier)
    pub fn xp_to_next_level(&self, xp: u64) -> Option<u64> {
        let next = self.next_tier(self.lookup(xp))?;
        Some(next.min_xp.saturating_sub(xp))
    }

    pub fn max_level(&self) -> u32 {
        self.tiers.last().map(|t| t.level).unwrap_or(1)
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Progress through `tier` in whole percent, 0..=100
///
/// The unbounded top tier always reports 100.
pub fn level_progress_percent(xp: u64, tier: &LevelThreshold) -> u8 {
    let Some(max) = tier.max_xp else {
        return 100;
    };
    let range = max.saturating_sub(tier.min_xp);
    if range == 0 {
        return 100;
    }
    let in_level = xp.saturating_sub(tier.min_xp) as u128;
    let range = range as u128;
    // round half up: (200 * n + range) / (2 * range)
    let percent = (200 * in_level + range) / (2 * range);
    percent.min(100) as u8
}

fn config_error(msg: impl Into<String>) -> ProgressionError {
    ProgressionError::Configuration(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_boundaries() {
        let table = LevelTable::standard();
        assert_eq!(table.lookup(0).level, 1);
        assert_eq!(table.lookup(500).level, 1);
        assert_eq!(table.lookup(501).level, 2);
        assert_eq!(table.lookup(1500).level, 2);
        assert_eq!(table.lookup(1501).level, 3);
        assert_eq!(table.lookup(5000).level, 4);
        assert_eq!(table.lookup(5001).level, 5);
        assert_eq!(table.lookup(u64::MAX).name, "Master"); // Beyond all finite ranges
    }

    #[test]
    fn test_progress_percent() {
        let table = LevelTable::standard();
        let novice = table.lookup(0);
        assert_eq!(level_progress_percent(0, novice), 0);
        assert_eq!(level_progress_percent(250, novice), 50);
        assert_eq!(level_progress_percent(500, novice), 100);
        // 180 / 500 = 36%
        assert_eq!(level_progress_percent(180, novice), 36);

        let apprentice = table.lookup(600);
        // 99 / 999 = 9.9% -> 10
        assert_eq!(level_progress_percent(600, apprentice), 10);

        let master = table.lookup(9000);
        assert_eq!(level_progress_percent(9000, master), 100);
    }

    #[test]
    fn test_progress_percent_rounds_half_up() {
        let tier = LevelThreshold::new(1, "Tiny", 0, Some(8));
        // 1 / 8 = 12.5% -> 13
        assert_eq!(level_progress_percent(1, &tier), 13);
    }

    #[test]
    fn test_xp_to_next_level() {
        let table = LevelTable::standard();
        assert_eq!(table.xp_to_next_level(0), Some(501));
        assert_eq!(table.xp_to_next_level(490), Some(11));
        assert_eq!(table.xp_to_next_level(5000), Some(1));
        assert_eq!(table.xp_to_next_level(5001), None);
        assert_eq!(table.max_level(), 5);
    }

    #[test]
    fn test_rejects_gap() {
        let err = LevelTable::new(vec![
            LevelThreshold::new(1, "A", 0, Some(100)),
            LevelThreshold::new(2, "B", 150, None),
        ])
        .unwrap_err();
        assert!(matches!(err, ProgressionError::Configuration(_)));
    }

    #[test]
    fn test_rejects_overlap() {
        let result = LevelTable::new(vec![
            LevelThreshold::new(1, "A", 0, Some(100)),
            LevelThreshold::new(2, "B", 100, None),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_bounded_top_and_nonzero_start() {
        assert!(LevelTable::new(vec![LevelThreshold::new(1, "A", 0, Some(100))]).is_err());
        assert!(LevelTable::new(vec![LevelThreshold::new(1, "A", 10, None)]).is_err());
        assert!(LevelTable::new(Vec::new()).is_err());
    }

    #[test]
    fn test_rejects_unbounded_middle_tier() {
        let result = LevelTable::new(vec![
            LevelThreshold::new(1, "A", 0, None),
            LevelThreshold::new(2, "B", 101, None),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_single_unbounded_tier_is_valid() {
        let table = LevelTable::new(vec![LevelThreshold::new(1, "Only", 0, None)]).unwrap();
        assert_eq!(table.lookup(123_456).level, 1);
        assert_eq!(table.xp_to_next_level(10), None);
    }
}
