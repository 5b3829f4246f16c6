//! Business-day arithmetic over calendar dates.
//!
//! A workday is Monday through Friday. Holidays are not modelled.

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Returns true when `date` falls on Monday..=Friday.
pub fn is_workday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Advances `date` by `days` business days.
///
/// Whole weeks are skipped first, five workdays each, and the last one to
/// five days are stepped one calendar day at a time. Non-positive `days`
/// returns `date` unchanged, even when it is a weekend. Results past the end
/// of the calendar saturate at [`NaiveDate::MAX`].
pub fn add_workdays(
    date: NaiveDate,
    days: i64,
) -> NaiveDate {
    if days <= 0 {
        return date;
    }

    let weeks = (days - 1) / 5;
    let jumped = u64::try_from(weeks).ok().and_then(|w| w.checked_mul(7)).and_then(|n| date.checked_add_days(Days::new(n)));
    let Some(mut current) = jumped else {
        return NaiveDate::MAX;
    };

    let mut remaining = days - weeks * 5;
    while remaining > 0 {
        let Some(next) = current.checked_add_days(Days::new(1)) else {
            return NaiveDate::MAX;
        };
        current = next;
        if is_workday(current) {
            remaining -= 1;
        }
    }
    current
}

/// Counts business days in the half-open range `[from, to)`.
pub fn workdays_between(
    from: NaiveDate,
    to: NaiveDate,
) -> i64 {
    let mut count = 0;
    let mut current = from;
    while current < to {
        if is_workday(current) {
            count += 1;
        }
        current = next_day(current);
    }
    count
}

/// First workday strictly after `date`.
pub fn next_workday(date: NaiveDate) -> NaiveDate {
    let mut current = next_day(date);
    while !is_workday(current) {
        current = next_day(current);
    }
    current
}

/// Last workday strictly before `date`.
pub fn previous_workday(date: NaiveDate) -> NaiveDate {
    let mut current = previous_day(date);
    while !is_workday(current) {
        current = previous_day(current);
    }
    current
}

fn next_day(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(1)).unwrap_or(date)
}

fn previous_day(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(1)).unwrap_or(date)
}
