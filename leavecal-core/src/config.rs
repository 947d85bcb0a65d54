//! leavecal configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ASK_EXTRA_DAYS, DEFAULT_EXTRA_DAYS};
use crate::error::{LeaveCalError, LeaveCalResult};

/// Configuration at ~/.config/leavecal/config.toml
///
/// Every key can also be set through a `LEAVECAL_`-prefixed environment
/// variable (e.g. `LEAVECAL_MODEL=gpt-4o`). The model-access key is not part
/// of this file; it is read from `OPENAI_API_KEY`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaveCalConfig {
    /// SQLite database holding ingested events. `~` is expanded.
    pub database: PathBuf,

    /// Base URL of an OpenAI-compatible API.
    pub api_base: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub request_timeout_secs: u64,

    /// Extra leave days for recommendations built from stored holidays.
    pub extra_days: u32,
    /// Extra leave days for free-form questions.
    pub ask_extra_days: u32,
}

fn default_database() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("leavecal").join("events.db"))
        .unwrap_or_else(|| PathBuf::from("leavecal.db"))
}

impl Default for LeaveCalConfig {
    fn default() -> Self {
        LeaveCalConfig {
            database: default_database(),
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 200,
            temperature: 0.7,
            request_timeout_secs: 60,
            extra_days: DEFAULT_EXTRA_DAYS,
            ask_extra_days: DEFAULT_ASK_EXTRA_DAYS,
        }
    }
}

impl LeaveCalConfig {
    pub fn config_path() -> LeaveCalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| LeaveCalError::Config("Could not determine config directory".into()))?
            .join("leavecal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, creating a commented-out config file
    /// on first run.
    pub fn load() -> LeaveCalResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from a specific file (which may be missing), layered under the
    /// environment.
    pub fn load_from(path: &Path) -> LeaveCalResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("LEAVECAL").try_parsing(true))
            .build()
            .map_err(|e| LeaveCalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| LeaveCalError::Config(e.to_string()))
    }

    /// Database path with `~` expanded.
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.database.to_string_lossy()).into_owned())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> LeaveCalResult<()> {
        let defaults = LeaveCalConfig::default();
        let contents = format!(
            "\
# leavecal configuration

# Where ingested events are stored:
# database = \"{}\"

# OpenAI-compatible endpoint and model:
# api_base = \"{}\"
# model = \"{}\"
# max_tokens = {}
# temperature = {}
# request_timeout_secs = {}

# Extra leave days to plan with:
# extra_days = {}
# ask_extra_days = {}
",
            defaults.database.display(),
            defaults.api_base,
            defaults.model,
            defaults.max_tokens,
            defaults.temperature,
            defaults.request_timeout_secs,
            defaults.extra_days,
            defaults.ask_extra_days,
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                LeaveCalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| LeaveCalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// The resolved settings in config file syntax.
    pub fn to_toml(&self) -> LeaveCalResult<String> {
        toml::to_string_pretty(self).map_err(|e| LeaveCalError::Config(e.to_string()))
    }
}
