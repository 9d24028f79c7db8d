//! Record and login command implementations

use anyhow::Result;
use chrono::NaiveDate;

use progression::{BadgeDefinition, LessonEvent};

use super::Host;

/// Record a completed lesson and print what it earned
pub fn record_command(
    host: &Host,
    learner: &str,
    event: &LessonEvent,
    date: Option<NaiveDate>,
) -> Result<()> {
    let today = host.today(date);
    let mut session = host.store.open(learner, &host.engine)?;
    let result = host
        .engine
        .record_lesson_completion(session.state_mut(), event, today)?;
    session.save()?;

    println!("+{} XP ({} total)", result.points_earned, result.new_xp);
    if result.leveled_up {
        println!(
            "Level up! {} -> {} ({})",
            result.previous_level, result.new_level, result.level_name
        );
    } else {
        println!("Level {} ({})", result.new_level, result.level_name);
    }
    print_streak(result.streak_days, result.streak_changed);
    print_unlocked(&result.newly_unlocked_badges);

    Ok(())
}

/// Record a daily login and print the streak
pub fn login_command(host: &Host, learner: &str, date: Option<NaiveDate>) -> Result<()> {
    let today = host.today(date);
    let mut session = host.store.open(learner, &host.engine)?;
    let result = host.engine.record_daily_login(session.state_mut(), today)?;
    session.save()?;

    print_streak(result.streak_days, result.streak_changed);
    print_unlocked(&result.newly_unlocked_badges);

    Ok(())
}

fn print_streak(days: u32, changed: bool) {
    let unit = if days == 1 { "day" } else { "days" };
    if changed {
        println!("Streak: {} {}", days, unit);
    } else {
        println!("Streak: {} {} (already counted today)", days, unit);
    }
}

fn print_unlocked(badges: &[BadgeDefinition]) {
    for badge in badges {
        println!("Badge unlocked: {} {} - {}", badge.icon, badge.name, badge.description);
    }
}
