//! Calendar file extraction.
//!
//! Each supported file format has an [`Extractor`] that turns raw bytes into
//! [`CalendarEvent`]s. Extractors never fail: malformed records are skipped,
//! and structural damage stops the parse with whatever was read so far plus a
//! diagnostic.
//!
//! [`Extractors`] maps a declared type tag (`"pdf"`, `"ics"`, `"csv"`) to the
//! extractor that handles it. Unknown tags produce an empty [`Extraction`].

mod csv;
mod ics;
mod pdf;

pub use self::csv::CsvExtractor;
pub use self::ics::IcsExtractor;
pub use self::pdf::PdfExtractor;

use crate::event::CalendarEvent;
use chrono::NaiveDate;

/// Result of running an extractor over one file.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Extraction {
    pub events: Vec<CalendarEvent>,
    /// Set when the parse stopped early or part of the input was unreadable.
    pub diagnostic: Option<String>,
}

impl Extraction {
    pub fn new(events: Vec<CalendarEvent>) -> Self {
        Extraction {
            events,
            diagnostic: None,
        }
    }

    /// Partial result from a parse that hit a structural failure.
    pub fn partial(events: Vec<CalendarEvent>, diagnostic: impl Into<String>) -> Self {
        let diagnostic = diagnostic.into();
        tracing::warn!(events = events.len(), "{diagnostic}");
        Extraction {
            events,
            diagnostic: Some(diagnostic),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Parses one file format into calendar events.
pub trait Extractor {
    /// Declared type tag this extractor handles, lower case.
    fn tag(&self) -> &'static str;

    fn extract(&self, bytes: &[u8]) -> Extraction;
}

/// Registry of extractors keyed by type tag.
pub struct Extractors {
    extractors: Vec<Box<dyn Extractor + Send + Sync>>,
}

impl Default for Extractors {
    /// PDF, ICS and CSV.
    fn default() -> Self {
        Extractors::empty()
            .with(PdfExtractor)
            .with(IcsExtractor)
            .with(CsvExtractor)
    }
}

impl Extractors {
    pub fn empty() -> Self {
        Extractors {
            extractors: Vec::new(),
        }
    }

    /// Register an extractor. A later registration for the same tag wins.
    pub fn with(mut self, extractor: impl Extractor + Send + Sync + 'static) -> Self {
        self.extractors.retain(|e| e.tag() != extractor.tag());
        self.extractors.push(Box::new(extractor));
        self
    }

    /// Tags of every registered extractor.
    pub fn tags(&self) -> Vec<&'static str> {
        self.extractors.iter().map(|e| e.tag()).collect()
    }

    pub fn get(&self, tag: &str) -> Option<&(dyn Extractor + Send + Sync)> {
        self.extractors
            .iter()
            .find(|e| e.tag().eq_ignore_ascii_case(tag))
            .map(|e| e.as_ref())
    }

    /// Run the extractor for `tag`. Unknown tags yield an empty extraction.
    pub fn extract(&self, tag: &str, bytes: &[u8]) -> Extraction {
        match self.get(tag) {
            Some(extractor) => {
                let extraction = extractor.extract(bytes);
                tracing::debug!(
                    tag = extractor.tag(),
                    events = extraction.events.len(),
                    "extracted events"
                );
                extraction
            }
            None => {
                tracing::debug!(tag, "no extractor for file type");
                Extraction::default()
            }
        }
    }
}

/// Parse a strict `YYYY-MM-DD` date. Rejects unpadded fields, extra
/// characters and impossible dates.
pub(crate) fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let bytes = s.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shape_ok {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Derive the declared type tag from a file name: the lower-cased text after
/// the last `.`, or the whole name when there is no dot.
pub fn tag_for_file_name(file_name: &str) -> String {
    file_name
        .rsplit('.')
        .next()
        .unwrap_or(file_name)
        .to_lowercase()
}
