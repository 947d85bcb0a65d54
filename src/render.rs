//! TUI rendering for leavecal types.
//!
//! Extension traits that add colored terminal rendering to leavecal-core
//! types using owo_colors.

use leavecal_core::StoredEvent;
use leavecal_core::recommend::Recommendation;
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for StoredEvent {
    fn render(&self) -> String {
        let date = self.date.format("%Y-%m-%d %a").to_string();
        let name = if self.name.is_empty() {
            "(unnamed)".dimmed().to_string()
        } else {
            self.name.clone()
        };
        let holiday = if self.is_holiday {
            "Holiday: true".green().to_string()
        } else {
            "Holiday: false".dimmed().to_string()
        };

        format!("   {}  {} - {}", date.bold(), name, holiday)
    }
}

impl Render for Recommendation {
    fn render(&self) -> String {
        match self {
            Recommendation::Advice(_) => self.to_string(),
            Recommendation::NoHolidayDates => self.to_string().yellow().to_string(),
            Recommendation::Failed(_) => self.to_string().red().to_string(),
        }
    }
}

/// Render a list of stored events, one per line.
pub fn render_events(events: &[StoredEvent]) -> String {
    if events.is_empty() {
        return "   No events found.".dimmed().to_string();
    }

    events
        .iter()
        .map(|e| e.render())
        .collect::<Vec<_>>()
        .join("\n")
}
