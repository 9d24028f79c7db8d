//! Progression engine - the orchestrator over ledger, streaks and badges
//!
//! Processes one learner event at a time against a caller-owned
//! [`ProgressionState`]. The engine performs no I/O and never reads a clock:
//! `today` always comes from the host.

use chrono::NaiveDate;

use super::checker::{try_unlock, try_unlock_all};
use super::context::{EvaluationContext, MilestonePolicy};
use super::definitions::{
    BadgeCatalog, BadgeDefinition, BadgeIds, LESSON_BADGES, STREAK_MILESTONES, lesson_badge,
};
use super::ledger::{self, ScoringRules, XpAward};
use super::levels::{LevelTable, LevelThreshold, level_progress_percent};
use super::state::ProgressionState;
use super::streaks::{self, StreakTransition, StreakUpdate};
use crate::error::{ProgressionError, Result};

/// Facts about one completed lesson
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LessonEvent {
    pub module_id: Option<String>,
    pub lesson_id: Option<String>,
    /// Share of correct answers in `[0, 1]`
    pub accuracy: Option<f64>,
    pub fast_completion: bool,
}

impl LessonEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lesson(module_id: impl Into<String>, lesson_id: impl Into<String>) -> Self {
        Self {
            module_id: Some(module_id.into()),
            lesson_id: Some(lesson_id.into()),
            ..Self::default()
        }
    }

    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    pub fn fast(mut self) -> Self {
        self.fast_completion = true;
        self
    }
}

/// Summary of a recorded lesson completion
#[derive(Debug, Clone)]
pub struct LessonResult {
    pub points_earned: u64,
    pub new_xp: u64,
    pub leveled_up: bool,
    pub previous_level: u32,
    pub new_level: u32,
    pub level_name: String,
    pub streak_days: u32,
    pub streak_changed: bool,
    pub newly_unlocked_badges: Vec<BadgeDefinition>,
}

/// Summary of a recorded daily login
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub streak_days: u32,
    pub streak_changed: bool,
    pub newly_unlocked_badges: Vec<BadgeDefinition>,
}

/// Main entry point for all progression rules
///
/// Immutable after construction; share one instance across any number of learners.
#[derive(Debug, Clone)]
pub struct ProgressionEngine {
    levels: LevelTable,
    catalog: BadgeCatalog,
    scoring: ScoringRules,
    milestone_policy: MilestonePolicy,
}

impl Default for ProgressionEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl ProgressionEngine {
    /// Standard levels, standard catalog, default scoring, exact milestones
    pub fn standard() -> Self {
        Self {
            levels: LevelTable::standard(),
            catalog: BadgeCatalog::standard(),
            scoring: ScoringRules::default(),
            milestone_policy: MilestonePolicy::Exact,
        }
    }

    /// Create an engine, checking that the catalog defines every badge the rules award
    pub fn new(
        levels: LevelTable,
        catalog: BadgeCatalog,
        scoring: ScoringRules,
        milestone_policy: MilestonePolicy,
    ) -> Result<Self> {
        let awarded = std::iter::once(BadgeIds::FIRST_STEP)
            .chain(STREAK_MILESTONES.iter().map(|(_, id)| *id))
            .chain(LESSON_BADGES.iter().map(|(_, _, id)| *id));
        for id in awarded {
            if !catalog.contains(id) {
                return Err(ProgressionError::Configuration(format!(
                    "badge catalog is missing '{id}'"
                )));
            }
        }

        Ok(Self {
            levels,
            catalog,
            scoring,
            milestone_policy,
        })
    }

    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    pub fn catalog(&self) -> &BadgeCatalog {
        &self.catalog
    }

    pub fn scoring(&self) -> &ScoringRules {
        &self.scoring
    }

    pub fn milestone_policy(&self) -> MilestonePolicy {
        self.milestone_policy
    }

    /// Fresh state for a new learner
    pub fn new_state(&self) -> ProgressionState {
        ProgressionState::for_table(&self.levels)
    }

    // ========================================
    // EVENTS
    // ========================================

    /// Score a completed lesson, extend the streak and unlock badges
    ///
    /// Validation happens before any mutation: on error the state is unchanged.
    pub fn record_lesson_completion(
        &self,
        state: &mut ProgressionState,
        event: &LessonEvent,
        today: NaiveDate,
    ) -> Result<LessonResult> {
        let points = self
            .scoring
            .lesson_points(event.accuracy, event.fast_completion)?;
        let signed_points = i64::try_from(points).map_err(|_| {
            ProgressionError::InvalidArgument(format!("lesson points {points} out of range"))
        })?;

        // Read before the award: first_step depends on the XP the learner had going in
        let pre_event_xp = state.xp();

        // First mutation; fails without touching the state on overflow
        let award = self.add_xp(state, signed_points)?;
        let streak = self.touch(state, today);

        let ctx = EvaluationContext {
            pre_event_xp: Some(pre_event_xp),
            module_id: event.module_id.as_deref(),
            lesson_id: event.lesson_id.as_deref(),
            accuracy: event.accuracy,
            fast_completion: event.fast_completion,
            ..self.context(state)
        };

        let mut newly_unlocked = Vec::new();
        if pre_event_xp == 0 {
            newly_unlocked.extend(try_unlock(state, BadgeIds::FIRST_STEP, &ctx, &self.catalog)?);
        }
        newly_unlocked.extend(self.unlock_streak_milestones(state, &ctx)?);
        if let (Some(module_id), Some(lesson_id)) = (ctx.module_id, ctx.lesson_id) {
            if let Some(badge_id) = lesson_badge(module_id, lesson_id) {
                newly_unlocked.extend(try_unlock(state, badge_id, &ctx, &self.catalog)?);
            }
        }

        let level_name = self.levels.lookup(award.new_xp).name.clone();
        tracing::debug!(
            "Lesson scored: +{} XP ({} total), streak {} ({}), {} badge(s)",
            points,
            award.new_xp,
            streak.streak_days,
            streak.transition.as_str(),
            newly_unlocked.len()
        );

        Ok(LessonResult {
            points_earned: points,
            new_xp: award.new_xp,
            leveled_up: award.leveled_up,
            previous_level: award.previous_level,
            new_level: award.new_level,
            level_name,
            streak_days: streak.streak_days,
            streak_changed: streak.streak_changed,
            newly_unlocked_badges: newly_unlocked,
        })
    }

    /// Count a day of activity without scoring a lesson
    pub fn record_daily_login(
        &self,
        state: &mut ProgressionState,
        today: NaiveDate,
    ) -> Result<LoginResult> {
        let streak = self.touch(state, today);
        let ctx = self.context(state);
        let newly_unlocked = self.unlock_streak_milestones(state, &ctx)?;

        Ok(LoginResult {
            streak_days: streak.streak_days,
            streak_changed: streak.streak_changed,
            newly_unlocked_badges: newly_unlocked,
        })
    }

    // ========================================
    // COMPONENT OPERATIONS
    // ========================================

    /// Award XP and recompute the level
    pub fn add_xp(&self, state: &mut ProgressionState, points: i64) -> Result<XpAward> {
        let award = ledger::add_xp(state, points, &self.levels)?;
        if award.leveled_up {
            let tier = self.levels.lookup(award.new_xp);
            tracing::info!(
                "Level up: {} -> {} ({})",
                award.previous_level,
                award.new_level,
                tier.name
            );
        }
        Ok(award)
    }

    /// Apply the day-boundary rules for activity on `today`
    pub fn touch(&self, state: &mut ProgressionState, today: NaiveDate) -> StreakUpdate {
        let previous = state.streak_days();
        let update = streaks::touch(state, today);
        if update.transition == StreakTransition::Reset && previous > 1 {
            tracing::info!("Streak of {} days broken on {}", previous, today);
        }
        update
    }

    /// Unlock one badge if its predicate holds for `ctx`
    pub fn try_unlock(
        &self,
        state: &mut ProgressionState,
        badge_id: &str,
        ctx: &EvaluationContext<'_>,
    ) -> Result<Option<BadgeDefinition>> {
        try_unlock(state, badge_id, ctx, &self.catalog)
    }

    /// Evaluation context for the current state, without event facts
    pub fn context(&self, state: &ProgressionState) -> EvaluationContext<'static> {
        EvaluationContext {
            xp: state.xp(),
            level: state.level(),
            streak_days: state.streak_days(),
            milestone_policy: self.milestone_policy,
            ..EvaluationContext::default()
        }
    }

    fn unlock_streak_milestones(
        &self,
        state: &mut ProgressionState,
        ctx: &EvaluationContext<'_>,
    ) -> Result<Vec<BadgeDefinition>> {
        let due = STREAK_MILESTONES
            .iter()
            .filter(|(days, _)| self.milestone_policy.reached(ctx.streak_days, *days))
            .map(|(_, id)| *id);
        try_unlock_all(state, due, ctx, &self.catalog)
    }

    // ========================================
    // READ ACCESSORS
    // ========================================

    pub fn xp(&self, state: &ProgressionState) -> u64 {
        state.xp()
    }

    /// Current level tier (number and name)
    pub fn level<'a>(&'a self, state: &ProgressionState) -> &'a LevelThreshold {
        self.levels.lookup(state.xp())
    }

    pub fn level_progress_percent(&self, state: &ProgressionState) -> u8 {
        level_progress_percent(state.xp(), self.level(state))
    }

    /// XP still needed for the next level (None at the top tier)
    pub fn xp_to_next_level(&self, state: &ProgressionState) -> Option<u64> {
        self.levels.xp_to_next_level(state.xp())
    }

    /// Earned badges in earn order
    pub fn badges<'a>(&'a self, state: &ProgressionState) -> Vec<&'a BadgeDefinition> {
        state
            .earned_badges()
            .iter()
            .filter_map(|id| self.catalog.get(id))
            .collect()
    }

    pub fn streak_days(&self, state: &ProgressionState) -> u32 {
        state.streak_days()
    }

    pub fn longest_streak(&self, state: &ProgressionState) -> u32 {
        state.longest_streak()
    }

    /// Whether activity on `today` would keep the current streak going
    pub fn streak_active(&self, state: &ProgressionState, today: NaiveDate) -> bool {
        streaks::is_active(state, today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::definitions::BADGES;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    #[test]
    fn test_new_rejects_catalog_without_awarded_badges() {
        let catalog = BadgeCatalog::new(
            BADGES
                .iter()
                .filter(|b| b.id != BadgeIds::MARATHONER)
                .cloned()
                .collect(),
        )
        .unwrap();
        let result = ProgressionEngine::new(
            LevelTable::standard(),
            catalog,
            ScoringRules::default(),
            MilestonePolicy::Exact,
        );
        assert!(matches!(result, Err(ProgressionError::Configuration(_))));
    }

    #[test]
    fn test_invalid_accuracy_leaves_state_untouched() {
        let engine = ProgressionEngine::standard();
        let mut state = engine.new_state();
        engine
            .record_lesson_completion(&mut state, &LessonEvent::new(), d(1))
            .unwrap();
        let before = state.clone();

        let event = LessonEvent::lesson("2", "2").with_accuracy(1.5);
        let err = engine
            .record_lesson_completion(&mut state, &event, d(2))
            .unwrap_err();
        assert!(matches!(err, ProgressionError::InvalidArgument(_)));
        assert_eq!(state, before);
    }

    #[test]
    fn test_overflow_leaves_state_untouched() {
        let engine = ProgressionEngine::standard();
        let mut state = engine.new_state();
        state.xp = u64::MAX - 10;
        state.level = 5;
        let before = state.clone();

        assert!(engine
            .record_lesson_completion(&mut state, &LessonEvent::new(), d(1))
            .is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn test_daily_login_counts_streak_without_xp() {
        let engine = ProgressionEngine::standard();
        let mut state = engine.new_state();
        for day in 1..=7 {
            let result = engine.record_daily_login(&mut state, d(day)).unwrap();
            if day == 7 {
                let ids: Vec<_> = result.newly_unlocked_badges.iter().map(|b| b.id).collect();
                assert_eq!(ids, vec![BadgeIds::DILIGENT]);
            } else {
                assert!(result.newly_unlocked_badges.is_empty());
            }
        }
        assert_eq!(state.xp(), 0);
        assert_eq!(state.streak_days(), 7);
        // Logins never count as a first scored lesson
        assert!(!state.has_badge(BadgeIds::FIRST_STEP));
    }

    #[test]
    fn test_accessors() {
        let engine = ProgressionEngine::standard();
        let mut state = engine.new_state();
        engine
            .record_lesson_completion(
                &mut state,
                &LessonEvent::lesson("3", "1").with_accuracy(1.0).fast(),
                d(1),
            )
            .unwrap();

        assert_eq!(engine.xp(&state), 180);
        assert_eq!(engine.level(&state).name, "Novice");
        assert_eq!(engine.level_progress_percent(&state), 36);
        assert_eq!(engine.xp_to_next_level(&state), Some(321));
        assert_eq!(engine.streak_days(&state), 1);
        assert_eq!(engine.longest_streak(&state), 1);
        let names: Vec<_> = engine.badges(&state).iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["First Step", "API Maestro"]);
    }

    #[test]
    fn test_threshold_policy_catches_missed_milestone() {
        let engine = ProgressionEngine::new(
            LevelTable::standard(),
            BadgeCatalog::standard(),
            ScoringRules::default(),
            MilestonePolicy::Threshold,
        )
        .unwrap();
        let mut state = engine.new_state();
        state.streak_days = 7;
        state.longest_streak = 7;
        state.last_activity_date = Some(d(7));

        // Day 7 was never evaluated; day 8 still unlocks under threshold matching
        let result = engine
            .record_lesson_completion(&mut state, &LessonEvent::new(), d(8))
            .unwrap();
        assert_eq!(result.streak_days, 8);
        assert!(result
            .newly_unlocked_badges
            .iter()
            .any(|b| b.id == BadgeIds::DILIGENT));
    }
}
