//! Configuration loading and resolution
//!
//! All tunables live in one explicit [`Config`] struct handed to each
//! component at construction; nothing reads ambient process state after
//! startup. Resolution priority for the config file path:
//! 1. `--config` command-line argument
//! 2. `SHIFTPAY_CONFIG` environment variable
//! 3. `~/.config/shiftpay/config.toml` (platform config dir)
//!
//! Secrets may additionally be supplied via `SHIFTPAY_BOT_TOKEN` and
//! `SHIFTPAY_GEMINI_API_KEY`, which take priority over the TOML values.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Service configuration, deserialized from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Telegram Bot API token.
    #[serde(default)]
    pub bot_token: String,
    /// Chat id that receives prompts, reminders and reports.
    pub admin_chat_id: i64,
    /// Group chat id monitored for schedule messages.
    pub group_chat_id: i64,
    /// Name whose shifts are tracked, matched whole-word case-insensitive.
    pub tracked_name: String,
    /// Recognized venue names.
    #[serde(default = "default_venues")]
    pub venues: Vec<String>,
    /// Gemini API key; the model extractor is disabled when absent.
    #[serde(default)]
    pub gemini_api_key: Option<String>,
    /// SQLite database file path.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// Timeout for one model extraction request, in seconds.
    #[serde(default = "default_model_timeout_secs")]
    pub model_timeout_secs: u64,
    /// Interval between overdue-reminder sweeps, in seconds.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

fn default_venues() -> Vec<String> {
    ["Toscana", "Sicilia", "Siena", "Portofino", "Picolino"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_database_path() -> PathBuf {
    PathBuf::from("schedule.db")
}

fn default_model_timeout_secs() -> u64 {
    10
}

fn default_sweep_interval_secs() -> u64 {
    3600
}

impl Config {
    /// Load configuration from the resolved path, then apply environment
    /// overrides and validate.
    pub fn load(cli_path: Option<&Path>) -> Result<Config> {
        let path = resolve_config_path(cli_path)?;
        let contents = std::fs::read_to_string(&path).map_err(|e| {
            Error::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let mut config: Config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("invalid TOML in {}: {}", path.display(), e)))?;

        if let Ok(token) = std::env::var("SHIFTPAY_BOT_TOKEN") {
            if !token.trim().is_empty() {
                config.bot_token = token;
            }
        }
        if let Ok(key) = std::env::var("SHIFTPAY_GEMINI_API_KEY") {
            if !key.trim().is_empty() {
                config.gemini_api_key = Some(key);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot possibly run.
    pub fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            return Err(Error::Config(
                "bot_token is empty; set it in config.toml or SHIFTPAY_BOT_TOKEN".to_string(),
            ));
        }
        if self.tracked_name.trim().is_empty() {
            return Err(Error::Config("tracked_name is empty".to_string()));
        }
        if self.sweep_interval_secs == 0 {
            return Err(Error::Config("sweep_interval_secs must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Resolve the configuration file path (CLI → env → platform default).
fn resolve_config_path(cli_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = cli_path {
        return Ok(path.to_path_buf());
    }

    if let Ok(path) = std::env::var("SHIFTPAY_CONFIG") {
        return Ok(PathBuf::from(path));
    }

    dirs::config_dir()
        .map(|d| d.join("shiftpay").join("config.toml"))
        .ok_or_else(|| Error::Config("could not determine config directory".to_string()))
}
