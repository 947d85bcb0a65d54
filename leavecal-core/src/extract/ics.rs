//! ICS extraction using the icalendar crate's parser.
//!
//! The document is split into its top-level components and each one is
//! parsed on its own, so a truncated or damaged file still yields every event
//! that precedes the damage.

use chrono::NaiveDate;
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Component, read_calendar, unfold},
};

use super::{Extraction, Extractor};
use crate::event::CalendarEvent;

/// Name used for events without a SUMMARY.
pub const NO_TITLE: &str = "(No title)";

pub struct IcsExtractor;

impl Extractor for IcsExtractor {
    fn tag(&self) -> &'static str {
        "ics"
    }

    fn extract(&self, bytes: &[u8]) -> Extraction {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let content = String::from_utf8_lossy(bytes);
        let unfolded = unfold(&content);
        parse_events(&unfolded)
    }
}

/// Walk the unfolded document line by line, handing each complete top-level
/// component inside VCALENDAR to the parser.
fn parse_events(content: &str) -> Extraction {
    let mut events = Vec::new();
    let mut stack: Vec<String> = Vec::new();
    let mut block = String::new();
    let mut saw_calendar = false;

    for line in content.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let (key, value) = line.split_once(':').unwrap_or((line, ""));
        let value = value.trim().to_ascii_uppercase();

        if key.eq_ignore_ascii_case("BEGIN") {
            if stack.is_empty() && value != "VCALENDAR" {
                return fail(events, format!("expected BEGIN:VCALENDAR, found BEGIN:{value}"));
            }
            stack.push(value.clone());
            saw_calendar = true;
        } else if stack.is_empty() {
            return fail(events, format!("content outside VCALENDAR: {line}"));
        }

        if stack.len() >= 2 {
            block.push_str(line);
            block.push_str("\r\n");
        }

        if key.eq_ignore_ascii_case("END") {
            match stack.pop() {
                Some(open) if open == value => {}
                Some(open) => {
                    return fail(events, format!("END:{value} does not close BEGIN:{open}"));
                }
                None => return fail(events, format!("unexpected END:{value}")),
            }

            // A top-level component inside VCALENDAR just closed
            if stack.len() == 1 {
                if let Err(e) = read_block(&block, &mut events) {
                    return fail(events, e);
                }
                block.clear();
            }
        }
    }

    if let Some(open) = stack.last() {
        return fail(events, format!("document ended inside {open}"));
    }
    if !saw_calendar {
        return fail(events, "no VCALENDAR found".to_string());
    }

    Extraction::new(events)
}

fn fail(events: Vec<CalendarEvent>, reason: String) -> Extraction {
    Extraction::partial(events, format!("Error parsing ICS: {reason}"))
}

/// Parse one component block and collect the events it contains.
fn read_block(block: &str, events: &mut Vec<CalendarEvent>) -> Result<(), String> {
    let wrapped = format!("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n{block}END:VCALENDAR\r\n");
    let calendar = read_calendar(&wrapped).map_err(|e| e.to_string())?;
    for component in &calendar.components {
        collect_events(component, events);
    }
    Ok(())
}

fn collect_events(component: &Component, events: &mut Vec<CalendarEvent>) {
    if component.name.as_ref().eq_ignore_ascii_case("VEVENT") {
        match read_event(component) {
            Some(event) => events.push(event),
            None => tracing::debug!("skipping VEVENT without a readable DTSTART"),
        }
    }
    for child in &component.components {
        collect_events(child, events);
    }
}

fn read_event(vevent: &Component) -> Option<CalendarEvent> {
    let dtstart = vevent.find_prop("DTSTART")?;
    let date = match DatePerhapsTime::try_from(dtstart) {
        Ok(start) => to_date(start),
        // Fall back to the leading YYYYMMDD of the raw value
        Err(_) => NaiveDate::parse_from_str(dtstart.val.as_ref().get(..8)?, "%Y%m%d").ok()?,
    };

    let name = vevent
        .find_prop("SUMMARY")
        .map(|p| unescape_text(p.val.as_ref()))
        .unwrap_or_else(|| NO_TITLE.to_string());

    Some(CalendarEvent::new(date, name))
}

/// Drop time of day and timezone, keeping the calendar date as written.
fn to_date(start: DatePerhapsTime) -> NaiveDate {
    match start {
        DatePerhapsTime::Date(d) => d,
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            CalendarDateTime::Utc(dt) => dt.date_naive(),
            CalendarDateTime::Floating(naive) => naive.date(),
            CalendarDateTime::WithTimezone { date_time, .. } => date_time.date(),
        },
    }
}

/// Undo RFC 5545 TEXT escaping (`\,` `\;` `\n` `\\`).
fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
