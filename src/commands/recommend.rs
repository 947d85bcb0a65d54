use anyhow::Result;
use leavecal_core::recommend::Recommendation;
use owo_colors::OwoColorize;

use crate::AppPlanner;
use crate::render::Render;
use crate::utils::tui::with_spinner;

pub const SPINNER_MESSAGE: &str = "Consulting AI Travel Agent...";

pub async fn run(planner: &AppPlanner, extra_days: Option<u32>) -> Result<()> {
    let recommendation =
        with_spinner(SPINNER_MESSAGE, planner.recommend_stored(extra_days)).await?;
    print(&recommendation);
    Ok(())
}

pub fn print(recommendation: &Recommendation) {
    if recommendation.is_advice() {
        println!("{}", "Vacation Recommendation".bold());
    }
    println!("{}", recommendation.render());
}
