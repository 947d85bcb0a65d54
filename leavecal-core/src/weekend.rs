//! Weekend classification.

use chrono::{Datelike, NaiveDate, Weekday};

/// Returns true if the date falls on a Saturday or Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
