//! Facts handed to badge predicates

use serde::{Deserialize, Serialize};

/// How streak milestones (7 days, 30 days) are matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilestonePolicy {
    /// Streak must equal the milestone on the evaluated day
    #[default]
    Exact,
    /// Streak at or above the milestone (first crossing unlocks)
    Threshold,
}

impl MilestonePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Threshold => "threshold",
        }
    }

    pub fn reached(&self, streak_days: u32, milestone: u32) -> bool {
        match self {
            Self::Exact => streak_days == milestone,
            Self::Threshold => streak_days >= milestone,
        }
    }
}

/// Current state plus event-specific facts
#[derive(Debug, Clone, Default)]
pub struct EvaluationContext<'a> {
    pub xp: u64,
    pub level: u32,
    pub streak_days: u32,
    /// XP before the event was scored. Only set for lesson completions.
    pub pre_event_xp: Option<u64>,
    pub module_id: Option<&'a str>,
    pub lesson_id: Option<&'a str>,
    pub accuracy: Option<f64>,
    pub fast_completion: bool,
    pub milestone_policy: MilestonePolicy,
}

impl EvaluationContext<'_> {
    /// True when the event is the learner's first scored activity
    pub fn is_first_scored_activity(&self) -> bool {
        self.pre_event_xp == Some(0)
    }

    pub fn streak_reached(&self, milestone: u32) -> bool {
        self.milestone_policy.reached(self.streak_days, milestone)
    }
}
