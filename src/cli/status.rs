//! Status command implementation

use anyhow::Result;

use super::Host;

/// Show progression for one learner, or list all stored learners
pub fn status_command(host: &Host, learner: Option<&str>) -> Result<()> {
    let Some(learner) = learner else {
        let learners = host.store.learners()?;
        if learners.is_empty() {
            println!("No learners found in {}.", host.store.dir().display());
            return Ok(());
        }

        println!("Learners ({}):\n", learners.len());
        for id in learners {
            let state = host.store.peek(&id, &host.engine)?;
            let level = host.engine.level(&state);
            println!(
                "  {} - {} XP, level {} ({}), streak {}",
                id,
                state.xp(),
                level.level,
                level.name,
                state.streak_days()
            );
        }
        return Ok(());
    };

    if !host.store.contains(learner)? {
        println!(
            "No stored state for learner '{}' in {}.",
            learner,
            host.store.dir().display()
        );
        return Ok(());
    }

    let engine = &host.engine;
    let state = host.store.peek(learner, engine)?;
    let level = engine.level(&state);
    let today = host.today(None);

    println!("Learner: {}", learner);
    println!("  XP:      {}", engine.xp(&state));
    println!(
        "  Level:   {} ({}) - {}%",
        level.level,
        level.name,
        engine.level_progress_percent(&state)
    );
    match engine.xp_to_next_level(&state) {
        Some(needed) => println!("  Next:    {} XP to go", needed),
        None => println!("  Next:    max level reached"),
    }

    let streak = engine.streak_days(&state);
    let active = if streak > 0 && !engine.streak_active(&state, today) {
        " (broken, resets on next activity)"
    } else {
        ""
    };
    println!(
        "  Streak:  {} days{} (best {})",
        streak,
        active,
        engine.longest_streak(&state)
    );
    if let Some(last) = state.last_activity_date() {
        println!("  Last:    {}", last);
    }

    let badges = engine.badges(&state);
    println!(
        "  Badges:  {}/{}",
        badges.len(),
        engine.catalog().len()
    );
    for badge in badges {
        println!("    {} {}", badge.icon, badge.name);
    }

    Ok(())
}
