use anyhow::Result;
use owo_colors::OwoColorize;

use crate::AppPlanner;
use crate::render::render_events;

pub fn run(planner: &AppPlanner, holidays_only: bool) -> Result<()> {
    let events = if holidays_only {
        planner.store().holidays()?
    } else {
        planner.store().all()?
    };

    let title = if holidays_only {
        "Stored Holidays"
    } else {
        "Stored Calendar Events"
    };
    println!("{}", title.bold());
    println!("{}", render_events(&events));

    Ok(())
}
