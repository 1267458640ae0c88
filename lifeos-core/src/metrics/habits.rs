use std::collections::BTreeSet;

use chrono::{Days, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::model::HabitRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HabitProgress {
    pub completed_count: usize,
    pub total_count: usize,
    /// Rounded to the nearest whole percent; 0 for an empty list.
    pub percent_complete: u8,
    pub remaining_count: usize,
    pub streak_days: u32,
}

/// Completion figures for a set of habits. Order does not matter.
pub fn compute(habits: &[HabitRecord]) -> HabitProgress {
    let total_count = habits.len();
    let completed_count = habits.iter().filter(|h| h.completed).count();

    HabitProgress {
        completed_count,
        total_count,
        percent_complete: percent(completed_count, total_count),
        remaining_count: total_count - completed_count,
        streak_days: 0,
    }
}

/// [`compute`] plus the current streak as seen from `today` in `tz`.
pub fn compute_with_streak<Tz: TimeZone>(
    habits: &[HabitRecord],
    today: NaiveDate,
    tz: &Tz,
) -> HabitProgress {
    HabitProgress { streak_days: streak_days(habits, today, tz), ..compute(habits) }
}

/// Consecutive days, ending today, with at least one completed habit.
///
/// A day that has nothing completed yet does not break the streak until it is
/// over, so counting starts from yesterday in that case.
pub fn streak_days<Tz: TimeZone>(habits: &[HabitRecord], today: NaiveDate, tz: &Tz) -> u32 {
    let days: BTreeSet<NaiveDate> = habits
        .iter()
        .filter(|h| h.completed)
        .map(|h| h.created_at.with_timezone(tz).date_naive())
        .collect();

    let mut cursor = if days.contains(&today) {
        Some(today)
    } else {
        today.checked_sub_days(Days::new(1))
    };

    let mut streak = 0;
    while let Some(day) = cursor.filter(|d| days.contains(d)) {
        streak += 1;
        cursor = day.checked_sub_days(Days::new(1));
    }
    streak
}

fn percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u8
}
