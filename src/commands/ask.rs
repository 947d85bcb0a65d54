use anyhow::Result;

use crate::AppPlanner;
use crate::render::Render;
use crate::utils::tui::with_spinner;

pub async fn run(planner: &AppPlanner, question: Vec<String>, extra_days: Option<u32>) -> Result<()> {
    let question = question.join(" ");
    let question = Some(question.as_str()).filter(|q| !q.trim().is_empty());

    let response = with_spinner("Thinking...", planner.ask(question, extra_days)).await;

    println!("{}", response.render());
    Ok(())
}
