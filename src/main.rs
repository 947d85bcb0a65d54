mod commands;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use leavecal_core::config::LeaveCalConfig;
use leavecal_core::planner::Planner;
use leavecal_core::recommend::OpenAiRecommender;
use tracing_subscriber::EnvFilter;

pub type AppPlanner = Planner<OpenAiRecommender>;

#[derive(Parser)]
#[command(name = "leavecal")]
#[command(about = "Import calendar files, flag weekend holidays and plan extended vacations")]
struct Cli {
    /// Use this database instead of the configured one
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import events from a PDF, ICS or CSV calendar file
    Ingest {
        file: PathBuf,

        /// File type (pdf, ics, csv). Defaults to the file extension
        #[arg(short, long)]
        format: Option<String>,

        /// Ask for a vacation recommendation after importing
        #[arg(short, long)]
        recommend: bool,

        /// Extra leave days to plan with
        #[arg(short, long)]
        extra_days: Option<u32>,
    },
    /// List stored events
    Events {
        /// Only show holidays
        #[arg(long)]
        holidays: bool,
    },
    /// Get a vacation recommendation from the stored holidays
    Recommend {
        /// Extra leave days to plan with
        #[arg(short, long)]
        extra_days: Option<u32>,
    },
    /// Ask the travel agent a question
    Ask {
        question: Vec<String>,

        /// Extra leave days to plan with
        #[arg(short, long)]
        extra_days: Option<u32>,
    },
    /// Show configuration paths and settings
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // OPENAI_API_KEY may live in ./.env
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("no .env loaded: {e}");
    }

    let mut config = LeaveCalConfig::load()?;
    if let Some(db) = cli.db {
        config.database = db;
    }

    match cli.command {
        Commands::Ingest {
            file,
            format,
            recommend,
            extra_days,
        } => {
            let planner = open_planner(&config)?;
            commands::ingest::run(&planner, &file, format, recommend, extra_days).await
        }
        Commands::Events { holidays } => commands::events::run(&open_planner(&config)?, holidays),
        Commands::Recommend { extra_days } => {
            commands::recommend::run(&open_planner(&config)?, extra_days).await
        }
        Commands::Ask {
            question,
            extra_days,
        } => commands::ask::run(&open_planner(&config)?, question, extra_days).await,
        Commands::Config => commands::config::run(&config),
    }
}

/// Open the event store and model client described by `config`.
fn open_planner(config: &LeaveCalConfig) -> Result<AppPlanner> {
    let recommender = OpenAiRecommender::from_config(config)?;
    Ok(Planner::from_config(config, recommender)?)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
