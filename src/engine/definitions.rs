//! Badge definitions and metadata
//!
//! All badges are defined here with the predicates that grant them.

use std::borrow::Cow;
use std::collections::HashSet;

use super::context::EvaluationContext;
use crate::error::{ProgressionError, Result};

/// Predicate deciding whether a badge is earned for the given facts
pub type BadgePredicate = fn(&EvaluationContext<'_>) -> bool;

/// String ids of the standard badges
pub struct BadgeIds;

impl BadgeIds {
    pub const FIRST_STEP: &'static str = "first_step";
    pub const EXPLORER: &'static str = "explorer";
    pub const DILIGENT: &'static str = "diligent";
    pub const MARATHONER: &'static str = "marathoner";
    pub const PERFECTIONIST: &'static str = "perfectionist";
    pub const ROUTER: &'static str = "router";
    pub const DATA_ARCHITECT: &'static str = "data_architect";
    pub const API_MAESTRO: &'static str = "api_maestro";
    pub const OPTIMIZER: &'static str = "optimizer";
    pub const POLYGLOT: &'static str = "polyglot";
}

/// Streak milestones: (days, badge id)
pub const STREAK_MILESTONES: &[(u32, &str)] = &[
    (7, BadgeIds::DILIGENT),
    (30, BadgeIds::MARATHONER),
];

/// Lessons that grant a badge on completion: (module id, lesson id, badge id)
pub const LESSON_BADGES: &[(&str, &str, &str)] = &[
    ("2", "2", BadgeIds::ROUTER),
    ("2", "4", BadgeIds::DATA_ARCHITECT),
    ("3", "1", BadgeIds::API_MAESTRO),
    ("4", "3", BadgeIds::OPTIMIZER),
    ("3", "4", BadgeIds::POLYGLOT),
];

/// Badge granted by completing this exact lesson, if any
pub fn lesson_badge(module_id: &str, lesson_id: &str) -> Option<&'static str> {
    LESSON_BADGES
        .iter()
        .find(|(m, l, _)| *m == module_id && *l == lesson_id)
        .map(|(_, _, id)| *id)
}

/// Badge category for grouping in hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeCategory {
    Milestone,
    Streak,
    Module,
    /// Catalog entries whose facts the engine does not receive yet
    Reserved,
}

impl BadgeCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Milestone => "Milestones",
            Self::Streak => "Streaks",
            Self::Module => "Modules",
            Self::Reserved => "Coming soon",
        }
    }
}

/// Badge definition with all metadata
#[derive(Debug, Clone)]
pub struct BadgeDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: BadgeCategory,
    pub predicate: BadgePredicate,
}

impl BadgeDefinition {
    pub fn is_satisfied(&self, ctx: &EvaluationContext<'_>) -> bool {
        (self.predicate)(ctx)
    }
}

fn first_step(ctx: &EvaluationContext<'_>) -> bool {
    ctx.is_first_scored_activity()
}

fn diligent(ctx: &EvaluationContext<'_>) -> bool {
    ctx.streak_reached(7)
}

fn marathoner(ctx: &EvaluationContext<'_>) -> bool {
    ctx.streak_reached(30)
}

fn completed_lesson_for(ctx: &EvaluationContext<'_>, badge_id: &str) -> bool {
    match (ctx.module_id, ctx.lesson_id) {
        (Some(module_id), Some(lesson_id)) => lesson_badge(module_id, lesson_id) == Some(badge_id),
        _ => false,
    }
}

fn router(ctx: &EvaluationContext<'_>) -> bool {
    completed_lesson_for(ctx, BadgeIds::ROUTER)
}

fn data_architect(ctx: &EvaluationContext<'_>) -> bool {
    completed_lesson_for(ctx, BadgeIds::DATA_ARCHITECT)
}

fn api_maestro(ctx: &EvaluationContext<'_>) -> bool {
    completed_lesson_for(ctx, BadgeIds::API_MAESTRO)
}

fn optimizer(ctx: &EvaluationContext<'_>) -> bool {
    completed_lesson_for(ctx, BadgeIds::OPTIMIZER)
}

fn polyglot(ctx: &EvaluationContext<'_>) -> bool {
    completed_lesson_for(ctx, BadgeIds::POLYGLOT)
}

/// Navigation and per-module accuracy facts are not part of the event shape
fn not_supported(_ctx: &EvaluationContext<'_>) -> bool {
    false
}

/// All badge definitions
pub static BADGES: &[BadgeDefinition] = &[
    // === MILESTONE ===
    BadgeDefinition {
        id: BadgeIds::FIRST_STEP,
        name: "First Step",
        description: "Complete your first lesson",
        icon: "🚶",
        category: BadgeCategory::Milestone,
        predicate: first_step,
    },
    BadgeDefinition {
        id: BadgeIds::EXPLORER,
        name: "Explorer",
        description: "Visit every section of the application",
        icon: "🧭",
        category: BadgeCategory::Reserved,
        predicate: not_supported,
    },
    // === STREAK ===
    BadgeDefinition {
        id: BadgeIds::DILIGENT,
        name: "Diligent",
        description: "7 consecutive days of learning",
        icon: "📆",
        category: BadgeCategory::Streak,
        predicate: diligent,
    },
    BadgeDefinition {
        id: BadgeIds::MARATHONER,
        name: "Marathoner",
        description: "30 consecutive days of learning",
        icon: "🏃",
        category: BadgeCategory::Streak,
        predicate: marathoner,
    },
    BadgeDefinition {
        id: BadgeIds::PERFECTIONIST,
        name: "Perfectionist",
        description: "100% accuracy across an entire module",
        icon: "💯",
        category: BadgeCategory::Reserved,
        predicate: not_supported,
    },
    // === MODULE ===
    BadgeDefinition {
        id: BadgeIds::ROUTER,
        name: "Router",
        description: "Master the routing system",
        icon: "🧭",
        category: BadgeCategory::Module,
        predicate: router,
    },
    BadgeDefinition {
        id: BadgeIds::DATA_ARCHITECT,
        name: "Data Architect",
        description: "Expertise in data fetching",
        icon: "📊",
        category: BadgeCategory::Module,
        predicate: data_architect,
    },
    BadgeDefinition {
        id: BadgeIds::API_MAESTRO,
        name: "API Maestro",
        description: "Build advanced API routes",
        icon: "🔌",
        category: BadgeCategory::Module,
        predicate: api_maestro,
    },
    BadgeDefinition {
        id: BadgeIds::OPTIMIZER,
        name: "Optimizer",
        description: "Excellence in performance",
        icon: "⚡",
        category: BadgeCategory::Module,
        predicate: optimizer,
    },
    BadgeDefinition {
        id: BadgeIds::POLYGLOT,
        name: "Polyglot",
        description: "Implement internationalization",
        icon: "🌐",
        category: BadgeCategory::Module,
        predicate: polyglot,
    },
];

/// Immutable registry of badge definitions, keyed by id
#[derive(Debug, Clone)]
pub struct BadgeCatalog {
    badges: Cow<'static, [BadgeDefinition]>,
}

impl BadgeCatalog {
    /// The standard catalog
    pub fn standard() -> Self {
        Self {
            badges: Cow::Borrowed(BADGES),
        }
    }

    /// Build a custom catalog. Ids must be unique.
    pub fn new(badges: Vec<BadgeDefinition>) -> Result<Self> {
        let mut seen = HashSet::new();
        for badge in &badges {
            if !seen.insert(badge.id) {
                return Err(ProgressionError::Configuration(format!(
                    "duplicate badge id '{}'",
                    badge.id
                )));
            }
        }
        Ok(Self {
            badges: Cow::Owned(badges),
        })
    }

    pub fn get(&self, id: &str) -> Option<&BadgeDefinition> {
        self.badges.iter().find(|b| b.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn all(&self) -> &[BadgeDefinition] {
        &self.badges
    }

    pub fn by_category(&self, category: BadgeCategory) -> Vec<&BadgeDefinition> {
        self.badges.iter().filter(|b| b.category == category).collect()
    }

    pub fn len(&self) -> usize {
        self.badges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.badges.is_empty()
    }
}

impl Default for BadgeCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_ids_unique() {
        let mut ids: Vec<_> = BADGES.iter().map(|b| b.id).collect();
        ids.sort();
        let count = ids.len();
        ids.dedup();
        assert_eq!(ids.len(), count, "All badge IDs should be unique");
        assert_eq!(count, 10);
    }

    #[test]
    fn test_lesson_badges_are_in_catalog() {
        let catalog = BadgeCatalog::standard();
        for (_, _, id) in LESSON_BADGES {
            let badge = catalog.get(id).expect("lesson badge defined");
            assert_eq!(badge.category, BadgeCategory::Module);
        }
        for (_, id) in STREAK_MILESTONES {
            assert!(catalog.contains(id));
        }
    }

    #[test]
    fn test_lesson_lookup() {
        assert_eq!(lesson_badge("2", "2"), Some(BadgeIds::ROUTER));
        assert_eq!(lesson_badge("3", "4"), Some(BadgeIds::POLYGLOT));
        assert_eq!(lesson_badge("2", "3"), None);
        assert_eq!(lesson_badge("4", "2"), None);
    }

    #[test]
    fn test_module_predicates_need_exact_pair() {
        let catalog = BadgeCatalog::standard();
        let router = catalog.get(BadgeIds::ROUTER).unwrap();
        let ctx = EvaluationContext {
            module_id: Some("2"),
            lesson_id: Some("2"),
            ..Default::default()
        };
        assert!(router.is_satisfied(&ctx));
        assert!(!catalog.get(BadgeIds::DATA_ARCHITECT).unwrap().is_satisfied(&ctx));

        let module_only = EvaluationContext {
            module_id: Some("2"),
            ..Default::default()
        };
        assert!(!router.is_satisfied(&module_only));
    }

    #[test]
    fn test_reserved_badges_never_unlock() {
        let catalog = BadgeCatalog::standard();
        let ctx = EvaluationContext {
            xp: 10_000,
            streak_days: 30,
            pre_event_xp: Some(0),
            accuracy: Some(1.0),
            ..Default::default()
        };
        for badge in catalog.by_category(BadgeCategory::Reserved) {
            assert!(!badge.is_satisfied(&ctx), "{} should stay locked", badge.id);
        }
    }

    #[test]
    fn test_custom_catalog_rejects_duplicates() {
        let dup = vec![BADGES[0].clone(), BADGES[0].clone()];
        assert!(matches!(
            BadgeCatalog::new(dup),
            Err(ProgressionError::Configuration(_))
        ));
    }
}
