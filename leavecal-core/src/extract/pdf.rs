//! PDF extraction: rebuild page text from the content stream with lopdf and
//! scan it line by line for `YYYY-MM-DD: label` entries.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use lopdf::{Document, Encoding, Object, ObjectId};
use regex::Regex;

use super::{Extraction, Extractor, parse_iso_date};
use crate::event::CalendarEvent;

static DATED_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4}-\d{2}-\d{2})\s*[:\-]\s*(.+)").expect("valid dated line pattern")
});

/// TJ adjustments below this (in thousandths of a text unit) read as a word gap.
const WORD_GAP: f32 = -100.0;

pub struct PdfExtractor;

impl Extractor for PdfExtractor {
    fn tag(&self) -> &'static str {
        "pdf"
    }

    fn extract(&self, bytes: &[u8]) -> Extraction {
        let document = match Document::load_mem(bytes) {
            Ok(document) => document,
            Err(e) => return Extraction::partial(Vec::new(), format!("Error reading PDF: {e}")),
        };

        let mut text = String::new();
        let mut unreadable = Vec::new();

        // get_pages is keyed by 1-based page number, in order
        for (page_number, page_id) in document.get_pages() {
            match page_text(&document, page_id) {
                Ok(page_text) => {
                    text.push_str(&page_text);
                    text.push('\n');
                }
                Err(e) => {
                    tracing::debug!(page = page_number, "skipping unreadable PDF page: {e}");
                    unreadable.push(page_number.to_string());
                }
            }
        }

        let events = scan_text(&text);

        if unreadable.is_empty() {
            Extraction::new(events)
        } else {
            Extraction::partial(
                events,
                format!("Could not extract text from PDF page(s) {}", unreadable.join(", ")),
            )
        }
    }
}

/// Text of one page, one output line per text line.
///
/// Line breaks come from the positioning operators (`Td`, `TD`, `T*`, `Tm`,
/// `'`, `"`) and from the end of each text object. A `Td`/`TD` that only moves
/// sideways becomes a space.
fn page_text(document: &Document, page_id: ObjectId) -> lopdf::Result<String> {
    let encodings: BTreeMap<Vec<u8>, Encoding> = document
        .get_page_fonts(page_id)?
        .into_iter()
        .filter_map(|(name, font)| match font.get_font_encoding(document) {
            Ok(encoding) => Some((name, encoding)),
            Err(e) => {
                tracing::debug!("no usable encoding for font: {e}");
                None
            }
        })
        .collect();

    let content = document.get_and_decode_page_content(page_id)?;

    let mut text = String::new();
    let mut encoding = None;
    for operation in &content.operations {
        let operands = operation.operands.as_slice();
        match operation.operator.as_str() {
            "Tf" => {
                encoding = operands
                    .first()
                    .and_then(|font| font.as_name().ok())
                    .and_then(|font| encodings.get(font));
            }
            "Td" | "TD" => {
                let moves_down = operands
                    .get(1)
                    .and_then(|ty| ty.as_float().ok())
                    .is_some_and(|ty| ty != 0.0);
                if moves_down {
                    break_line(&mut text);
                } else {
                    separate_word(&mut text);
                }
            }
            "T*" | "Tm" | "ET" => break_line(&mut text),
            "'" | "\"" => {
                break_line(&mut text);
                show_text(&mut text, encoding, operands);
            }
            "Tj" | "TJ" => show_text(&mut text, encoding, operands),
            _ => {}
        }
    }

    Ok(text)
}

fn break_line(text: &mut String) {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
}

fn separate_word(text: &mut String) {
    if !text.is_empty() && !text.ends_with(char::is_whitespace) {
        text.push(' ');
    }
}

/// Append the strings of a text-showing operator. Numbers are skipped
/// except large TJ gaps.
fn show_text(text: &mut String, encoding: Option<&Encoding>, operands: &[Object]) {
    for operand in operands {
        match operand {
            Object::String(bytes, _) => text.push_str(&decode(encoding, bytes)),
            Object::Array(items) => show_text(text, encoding, items),
            Object::Integer(_) | Object::Real(_) => {
                if operand.as_float().is_ok_and(|gap| gap < WORD_GAP) {
                    separate_word(text);
                }
            }
            _ => {}
        }
    }
}

fn decode(encoding: Option<&Encoding>, bytes: &[u8]) -> String {
    match encoding.map(|encoding| Document::decode_text(encoding, bytes)) {
        Some(Ok(decoded)) => decoded,
        Some(Err(e)) => {
            tracing::debug!("falling back to raw PDF string bytes: {e}");
            String::from_utf8_lossy(bytes).into_owned()
        }
        None => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Find every line holding a date followed by `:` or `-` and a label.
pub fn scan_text(text: &str) -> Vec<CalendarEvent> {
    text.lines()
        .filter_map(|line| {
            let captures = DATED_LINE.captures(line)?;
            let date = parse_iso_date(&captures[1]).or_else(|| {
                tracing::debug!(line, "skipping line with invalid date");
                None
            })?;
            Some(CalendarEvent::new(date, captures[2].trim()))
        })
        .collect()
}
