use crate::calendar::{date_key, week_key};
use crate::errors::RuleViolation;
use crate::models::{Event, GainActivity};
use crate::stats::{done_today, weekly_count};
use chrono::NaiveDate;

/// Decides whether `activity` may be logged on `date`. First failing rule wins.
///
/// Losses have no counterpart: they are always allowed while the activity
/// still exists in the catalog.
pub fn check_gain(
    activity: &GainActivity,
    log: &[Event],
    date: NaiveDate,
) -> Result<(), RuleViolation> {
    if done_today(log, &activity.id, &date_key(date)) {
        return Err(RuleViolation::AlreadyDoneToday);
    }

    let count = weekly_count(log, &activity.id, &week_key(date));
    if count >= activity.max_per_week as usize {
        return Err(RuleViolation::WeeklyLimitReached {
            count,
            max_per_week: activity.max_per_week,
        });
    }

    Ok(())
}
