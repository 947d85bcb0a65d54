//! SQLite-backed event storage.

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{Connection, Row, params};

use crate::error::LeaveCalResult;
use crate::event::{CalendarEvent, StoredEvent};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    event_date TEXT NOT NULL,
    event_name TEXT NOT NULL DEFAULT '',
    holiday_flag INTEGER NOT NULL DEFAULT 0,
    UNIQUE (event_date, event_name)
);

CREATE INDEX IF NOT EXISTS idx_events_date ON events(event_date);
";

/// Durable table of ingested events.
pub struct EventStore {
    conn: Connection,
}

impl EventStore {
    /// Open or create the database at path.
    pub fn open(path: &Path) -> LeaveCalResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        tracing::debug!(path = %path.display(), "opened event store");

        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> LeaveCalResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Insert the event unless a row with the same date and name exists.
    ///
    /// Returns true if a new row was written. The holiday flag of an existing
    /// row is left untouched.
    pub fn insert_if_absent(&self, event: &CalendarEvent, is_holiday: bool) -> LeaveCalResult<bool> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO events (event_date, event_name, holiday_flag) VALUES (?1, ?2, ?3)",
            params![event.date, event.name, is_holiday],
        )?;
        Ok(inserted == 1)
    }

    /// Every stored event, ordered by date (then insertion order).
    pub fn all(&self) -> LeaveCalResult<Vec<StoredEvent>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, event_date, event_name, holiday_flag FROM events ORDER BY event_date, id",
        )?;
        let events = stmt
            .query_map([], row_to_event)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(events)
    }

    /// Stored holidays only, ordered by date.
    pub fn holidays(&self) -> LeaveCalResult<Vec<StoredEvent>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, event_date, event_name, holiday_flag FROM events \
             WHERE holiday_flag = 1 ORDER BY event_date, id",
        )?;
        let events = stmt
            .query_map([], row_to_event)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(events)
    }
}

fn row_to_event(row: &Row<'_>) -> rusqlite::Result<StoredEvent> {
    Ok(StoredEvent {
        id: row.get(0)?,
        date: row.get::<_, NaiveDate>(1)?,
        name: row.get(2)?,
        is_holiday: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(y: i32, m: u32, d: u32, name: &str) -> CalendarEvent {
        CalendarEvent::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), name)
    }

    #[test]
    fn test_insert_if_absent_deduplicates_on_date_and_name() {
        let store = EventStore::open_in_memory().unwrap();
        let new_year = event(2025, 1, 1, "New Year");

        assert!(store.insert_if_absent(&new_year, false).unwrap());
        assert!(!store.insert_if_absent(&new_year, false).unwrap());
        assert_eq!(store.all().unwrap().len(), 1);

        // Same date, different name is a different row
        assert!(store.insert_if_absent(&event(2025, 1, 1, "Brunch"), false).unwrap());
        // Same name, different date too
        assert!(store.insert_if_absent(&event(2026, 1, 1, "New Year"), false).unwrap());
        assert_eq!(store.all().unwrap().len(), 3);
    }

    #[test]
    fn test_empty_names_deduplicate() {
        let store = EventStore::open_in_memory().unwrap();
        let unnamed = event(2025, 3, 1, "");

        assert!(store.insert_if_absent(&unnamed, true).unwrap());
        assert!(!store.insert_if_absent(&unnamed, true).unwrap());
    }

    #[test]
    fn test_all_is_ordered_by_date_regardless_of_insertion_order() {
        let store = EventStore::open_in_memory().unwrap();
        for e in [
            event(2025, 12, 25, "Christmas"),
            event(2025, 1, 1, "New Year"),
            event(2025, 7, 4, "Independence Day"),
            event(2024, 12, 31, "New Year's Eve"),
        ] {
            store.insert_if_absent(&e, false).unwrap();
        }

        let dates: Vec<NaiveDate> = store.all().unwrap().iter().map(|e| e.date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
        assert_eq!(dates.len(), 4);
    }

    #[test]
    fn test_holiday_flag_is_frozen_at_first_insert() {
        let store = EventStore::open_in_memory().unwrap();
        let e = event(2025, 6, 7, "Picnic");

        store.insert_if_absent(&e, false).unwrap();
        store.insert_if_absent(&e, true).unwrap();

        let stored = store.all().unwrap();
        assert_eq!(stored.len(), 1);
        assert!(!stored[0].is_holiday);
        assert!(store.holidays().unwrap().is_empty());
    }

    #[test]
    fn test_open_persists_across_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("events.db");

        {
            let store = EventStore::open(&path).unwrap();
            store.insert_if_absent(&event(2025, 5, 3, "Market"), true).unwrap();
        }

        let reopened = EventStore::open(&path).unwrap();
        let events = reopened.all().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "Market");
        assert!(events[0].is_holiday);
        assert!(events[0].id > 0);
    }
}
