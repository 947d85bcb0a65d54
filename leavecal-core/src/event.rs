//! Event types shared by the extractors, the store and the CLI.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dated entry read from a calendar file.
///
/// Produced by an extractor and consumed straight away by ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub date: NaiveDate,
    /// Free-text label. Empty when the source had none.
    pub name: String,
}

impl CalendarEvent {
    pub fn new(date: NaiveDate, name: impl Into<String>) -> Self {
        CalendarEvent {
            date,
            name: name.into(),
        }
    }
}

impl fmt::Display for CalendarEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.date, self.name)
    }
}

/// A persisted event row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEvent {
    pub id: i64,
    pub date: NaiveDate,
    pub name: String,
    /// Weekend classification taken when the row was inserted. Never
    /// recomputed afterwards.
    pub is_holiday: bool,
}

impl fmt::Display for StoredEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} - Holiday: {}",
            self.date, self.name, self.is_holiday
        )
    }
}

/// Dates of every holiday row, in the order given.
pub fn holiday_dates(events: &[StoredEvent]) -> Vec<NaiveDate> {
    events
        .iter()
        .filter(|e| e.is_holiday)
        .map(|e| e.date)
        .collect()
}
