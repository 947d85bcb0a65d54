use anyhow::Result;
use leavecal_core::config::LeaveCalConfig;
use leavecal_core::recommend::openai_key_present;
use owo_colors::OwoColorize;

pub fn run(config: &LeaveCalConfig) -> Result<()> {
    let config_path = LeaveCalConfig::config_path()?;

    println!("{}", "Paths".bold());
    println!("  Config:    {}", config_path.display());
    println!("  Database:  {}", config.database_path().display());

    println!();
    println!("{}", "Model".bold());
    println!(
        "  API key:   {}",
        if openai_key_present() {
            "set".green().to_string()
        } else {
            "not set (OPENAI_API_KEY)".yellow().to_string()
        }
    );

    println!();
    println!("{}", "Settings".bold());
    for line in config.to_toml()?.lines() {
        println!("  {line}");
    }

    Ok(())
}
