//! Badge unlock logic
//!
//! Applies catalog predicates to the current facts. Unlocking is idempotent:
//! an earned badge is never evaluated again and never removed.

use super::context::EvaluationContext;
use super::definitions::{BadgeCatalog, BadgeDefinition};
use super::state::ProgressionState;
use crate::error::{ProgressionError, Result};

/// Try to unlock `badge_id`
///
/// Returns the definition when the badge was unlocked by this call, `None` when
/// it was already earned or its predicate does not hold.
pub fn try_unlock(
    state: &mut ProgressionState,
    badge_id: &str,
    ctx: &EvaluationContext<'_>,
    catalog: &BadgeCatalog,
) -> Result<Option<BadgeDefinition>> {
    let badge = catalog
        .get(badge_id)
        .ok_or_else(|| ProgressionError::UnknownBadge(badge_id.to_string()))?;

    if state.has_badge(badge_id) {
        return Ok(None);
    }

    if !badge.is_satisfied(ctx) {
        tracing::debug!("Badge {} not earned yet", badge_id);
        return Ok(None);
    }

    state.earned_badges.push(badge.id.to_string());
    tracing::info!("Badge unlocked: {} {}", badge.icon, badge.name);
    Ok(Some(badge.clone()))
}

/// Try several badges in order, collecting the ones unlocked now
pub fn try_unlock_all<'i>(
    state: &mut ProgressionState,
    badge_ids: impl IntoIterator<Item = &'i str>,
    ctx: &EvaluationContext<'_>,
    catalog: &BadgeCatalog,
) -> Result<Vec<BadgeDefinition>> {
    let mut newly_unlocked = Vec::new();
    for id in badge_ids {
        if let Some(badge) = try_unlock(state, id, ctx, catalog)? {
            newly_unlocked.push(badge);
        }
    }
    Ok(newly_unlocked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::definitions::BadgeIds;

    fn router_ctx() -> EvaluationContext<'static> {
        EvaluationContext {
            module_id: Some("2"),
            lesson_id: Some("2"),
            ..Default::default()
        }
    }

    #[test]
    fn test_unlock_once() {
        let catalog = BadgeCatalog::standard();
        let mut state = ProgressionState::new();
        let ctx = router_ctx();

        let first = try_unlock(&mut state, BadgeIds::ROUTER, &ctx, &catalog).unwrap();
        assert_eq!(first.map(|b| b.id), Some(BadgeIds::ROUTER));

        let second = try_unlock(&mut state, BadgeIds::ROUTER, &ctx, &catalog).unwrap();
        assert!(second.is_none());
        assert_eq!(state.earned_badges(), &["router".to_string()]);
    }

    #[test]
    fn test_unsatisfied_predicate_does_not_mutate() {
        let catalog = BadgeCatalog::standard();
        let mut state = ProgressionState::new();
        let ctx = EvaluationContext {
            streak_days: 6,
            ..Default::default()
        };
        let result = try_unlock(&mut state, BadgeIds::DILIGENT, &ctx, &catalog).unwrap();
        assert!(result.is_none());
        assert!(state.earned_badges().is_empty());
    }

    #[test]
    fn test_unknown_badge() {
        let catalog = BadgeCatalog::standard();
        let mut state = ProgressionState::new();
        let err = try_unlock(&mut state, "golden_ticket", &router_ctx(), &catalog).unwrap_err();
        assert_eq!(err, ProgressionError::UnknownBadge("golden_ticket".to_string()));
    }

    #[test]
    fn test_already_earned_skips_predicate() {
        let catalog = BadgeCatalog::standard();
        let mut state = ProgressionState::new();
        let ctx = EvaluationContext {
            pre_event_xp: Some(0),
            ..Default::default()
        };
        try_unlock(&mut state, BadgeIds::FIRST_STEP, &ctx, &catalog).unwrap();

        // Predicate no longer holds; the badge stays earned
        let later = EvaluationContext {
            pre_event_xp: Some(500),
            ..Default::default()
        };
        assert!(try_unlock(&mut state, BadgeIds::FIRST_STEP, &later, &catalog)
            .unwrap()
            .is_none());
        assert!(state.has_badge(BadgeIds::FIRST_STEP));
    }

    #[test]
    fn test_unlock_all_keeps_order() {
        let catalog = BadgeCatalog::standard();
        let mut state = ProgressionState::new();
        let ctx = EvaluationContext {
            pre_event_xp: Some(0),
            streak_days: 7,
            module_id: Some("2"),
            lesson_id: Some("2"),
            ..Default::default()
        };
        let unlocked = try_unlock_all(
            &mut state,
            [BadgeIds::FIRST_STEP, BadgeIds::DILIGENT, BadgeIds::ROUTER],
            &ctx,
            &catalog,
        )
        .unwrap();
        let ids: Vec<_> = unlocked.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec!["first_step", "diligent", "router"]);
    }
}
