use std::path::Path;

use anyhow::{Context, Result};
use leavecal_core::extract::tag_for_file_name;
use owo_colors::OwoColorize;

use crate::AppPlanner;
use crate::render::render_events;
use crate::utils::tui::with_spinner;

pub async fn run(
    planner: &AppPlanner,
    file: &Path,
    format: Option<String>,
    recommend: bool,
    extra_days: Option<u32>,
) -> Result<()> {
    let file_type = match format {
        Some(format) => format.to_lowercase(),
        None => tag_for_file_name(&file.file_name().unwrap_or_default().to_string_lossy()),
    };
    println!("Processing file of type: {}", file_type.bold());

    let bytes =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;

    if planner.extractors().get(&file_type).is_none() {
        println!(
            "{}",
            format!(
                "No parser for '{}' files (supported: {})",
                file_type,
                planner.extractors().tags().join(", ")
            )
            .yellow()
        );
    }

    let report = planner.ingest(&bytes, &file_type)?;

    if let Some(diagnostic) = &report.diagnostic {
        println!("{}", diagnostic.yellow());
    }
    println!(
        "{}",
        format!("Processed and stored {} new event(s).", report.inserted).green()
    );

    println!();
    println!("{}", "Stored Calendar Events".bold());
    println!("{}", render_events(&report.events));

    if recommend {
        println!();
        let recommendation = with_spinner(
            super::recommend::SPINNER_MESSAGE,
            planner.recommend(&report.holiday_dates, extra_days),
        )
        .await;
        super::recommend::print(&recommendation);
    }

    Ok(())
}
