//! Pure calendar arithmetic for recurrence patterns.
//!
//! Everything here is a function of its arguments: no clock reads, no
//! hidden state, so a fixed pattern and date always produce the same
//! answer regardless of timezone or wall time.

use chrono::{Datelike, Duration, NaiveDate};

use super::{frequency::Frequency, pattern::RecurringExpense};

/// Computes the first date the pattern falls due strictly after `after`.
///
/// The candidate never precedes `start_date`. Returns `None` when the
/// pattern is inactive (callers skip inactive patterns, but the calculator
/// tolerates them) or when the candidate would land past `end_date`.
pub fn next_occurrence(pattern: &RecurringExpense, after: NaiveDate) -> Option<NaiveDate> {
    if !pattern.is_active {
        return None;
    }
    let candidate = first_candidate(pattern, after);
    match pattern.end_date {
        Some(end) if candidate > end => None,
        _ => Some(candidate),
    }
}

/// True when the pattern can produce no occurrence strictly after `date`.
///
/// Unlike [`next_occurrence`] this ignores `is_active`: a deactivated
/// pattern is paused, not ended.
pub fn has_ended(pattern: &RecurringExpense, date: NaiveDate) -> bool {
    match pattern.end_date {
        Some(end) => first_candidate(pattern, date) > end,
        None => false,
    }
}

fn first_candidate(pattern: &RecurringExpense, after: NaiveDate) -> NaiveDate {
    let floor = (after + Duration::days(1)).max(pattern.start_date);
    aligned_on_or_after(&pattern.frequency, floor)
}

/// Earliest date on or after `floor` matching the frequency's alignment.
fn aligned_on_or_after(frequency: &Frequency, floor: NaiveDate) -> NaiveDate {
    match *frequency {
        Frequency::Daily => floor,
        Frequency::Weekly { weekday } => {
            let current = i64::from(floor.weekday().num_days_from_sunday());
            let ahead = (i64::from(weekday) - current).rem_euclid(7);
            floor + Duration::days(ahead)
        }
        Frequency::Monthly { day_of_month } => {
            let day = u32::from(day_of_month);
            let candidate = clamped_date(floor.year(), floor.month(), day);
            if candidate >= floor {
                candidate
            } else {
                let (year, month) = next_month(floor.year(), floor.month());
                clamped_date(year, month, day)
            }
        }
        Frequency::Yearly {
            month,
            day_of_month,
        } => {
            let month = u32::from(month);
            let day = u32::from(day_of_month);
            let candidate = clamped_date(floor.year(), month, day);
            if candidate >= floor {
                candidate
            } else {
                clamped_date(floor.year() + 1, month, day)
            }
        }
    }
}

fn clamped_date(year: i32, month: u32, day: u32) -> NaiveDate {
    let day = day.min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = next_month(year, month);
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap());
    (first_next - Duration::days(1)).day()
}
