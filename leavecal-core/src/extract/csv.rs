//! CSV extraction. Expects a header row with `date` (YYYY-MM-DD) and
//! `event_name` columns, matched case-insensitively.

use ::csv::ReaderBuilder;

use super::{Extraction, Extractor, parse_iso_date};
use crate::event::CalendarEvent;

const DATE_COLUMN: &str = "date";
const NAME_COLUMN: &str = "event_name";

pub struct CsvExtractor;

impl Extractor for CsvExtractor {
    fn tag(&self) -> &'static str {
        "csv"
    }

    fn extract(&self, bytes: &[u8]) -> Extraction {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(bytes);

        let headers = match reader.headers() {
            Ok(headers) => headers.clone(),
            Err(e) => return Extraction::partial(Vec::new(), format!("Error parsing CSV: {e}")),
        };

        let column = |wanted: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(wanted))
        };
        let (Some(date_idx), Some(name_idx)) = (column(DATE_COLUMN), column(NAME_COLUMN)) else {
            tracing::debug!(headers = ?headers, "CSV is missing the date or event_name column");
            return Extraction::default();
        };

        let mut events = Vec::new();
        for record in reader.records() {
            let record = match record {
                Ok(record) => record,
                Err(e) => return Extraction::partial(events, format!("Error parsing CSV: {e}")),
            };

            let Some(date) = record.get(date_idx).and_then(parse_iso_date) else {
                tracing::debug!(row = ?record, "skipping row with invalid date");
                continue;
            };
            let name = record.get(name_idx).unwrap_or_default();
            events.push(CalendarEvent::new(date, name));
        }

        Extraction::new(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn extract(csv: &str) -> Extraction {
        CsvExtractor.extract(csv.as_bytes())
    }

    #[test]
    fn test_bad_date_row_is_dropped() {
        let extraction = extract("date,event_name\n2025-07-04,Independence Day\n2025-13-01,Bad\n");

        assert_eq!(
            extraction.events,
            vec![CalendarEvent::new(date(2025, 7, 4), "Independence Day")]
        );
        assert!(extraction.diagnostic.is_none());
    }

    #[test]
    fn test_missing_event_name_column_yields_nothing() {
        let extraction = extract("date,title\n2025-07-04,Independence Day\n");

        assert!(extraction.events.is_empty());
        assert!(extraction.diagnostic.is_none());
    }

    #[test]
    fn test_headers_match_case_insensitively_and_extra_columns_ignored() {
        let extraction = extract(
            "Location,Event_Name,DATE\nOffice,Founders Day,2025-09-06\nHome,Picnic,2025-09-07\n",
        );

        assert_eq!(
            extraction.events,
            vec![
                CalendarEvent::new(date(2025, 9, 6), "Founders Day"),
                CalendarEvent::new(date(2025, 9, 7), "Picnic"),
            ]
        );
    }

    #[test]
    fn test_name_is_taken_verbatim() {
        let extraction = extract("date,event_name\n2025-05-01,  Labour Day \n2025-05-02,42\n");

        assert_eq!(extraction.events[0].name, "  Labour Day ");
        assert_eq!(extraction.events[1].name, "42");
    }

    #[test]
    fn test_date_must_be_strict() {
        let extraction = extract("date,event_name\n2025-7-4,Short\n2025-07-04 ,Padded\n07/04/2025,US\n");
        assert!(extraction.events.is_empty());
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let extraction = extract("\u{feff}date,event_name\n2025-12-31,New Year's Eve\n");
        assert_eq!(extraction.events.len(), 1);
    }

    #[test]
    fn test_malformed_structure_keeps_earlier_rows() {
        let extraction = extract(
            "date,event_name\n2025-01-01,New Year\n2025-01-02,Too,Many,Fields\n2025-01-03,Later\n",
        );

        assert_eq!(
            extraction.events,
            vec![CalendarEvent::new(date(2025, 1, 1), "New Year")]
        );
        assert!(
            extraction
                .diagnostic
                .as_deref()
                .is_some_and(|d| d.starts_with("Error parsing CSV"))
        );
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(extract("").is_empty());
    }
}
