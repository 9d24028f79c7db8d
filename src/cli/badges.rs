//! Badge catalog and level table listings

use anyhow::Result;

use progression::BadgeCategory;

use super::Host;

const CATEGORIES: [BadgeCategory; 4] = [
    BadgeCategory::Milestone,
    BadgeCategory::Streak,
    BadgeCategory::Module,
    BadgeCategory::Reserved,
];

/// List every badge grouped by category, marking the learner's earned ones
pub fn badges_command(host: &Host, learner: Option<&str>) -> Result<()> {
    let state = learner
        .map(|id| host.store.peek(id, &host.engine))
        .transpose()?;

    for category in CATEGORIES {
        let badges = host.engine.catalog().by_category(category);
        if badges.is_empty() {
            continue;
        }

        println!("{}:", category.label());
        for badge in badges {
            let mark = match &state {
                Some(state) if state.has_badge(badge.id) => "[x] ",
                Some(_) => "[ ] ",
                None => "",
            };
            println!(
                "  {}{} {} ({}) - {}",
                mark, badge.icon, badge.name, badge.id, badge.description
            );
        }
        println!();
    }

    Ok(())
}

/// Print the level table
pub fn levels_command(host: &Host) {
    for tier in host.engine.levels().tiers() {
        let range = match tier.max_xp {
            Some(max) => format!("{} - {} XP", tier.min_xp, max),
            None => format!("{}+ XP", tier.min_xp),
        };
        println!("  {:>2}  {:<12} {}", tier.level, tier.name, range);
    }

    let scoring = host.engine.scoring();
    println!();
    println!(
        "Lesson XP: {} base, up to {} for accuracy, {} for speed",
        scoring.base_points, scoring.accuracy_bonus_max, scoring.speed_bonus
    );

    let policy = host.engine.milestone_policy();
    println!("Streak milestones: {} match", policy.as_str());
}
