//! Application configuration.
//!
//! Read from `<config_dir>/config.json`. A missing file means defaults;
//! command-line flags override individual fields afterwards.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use weekhours_core::StatusThresholds;

/// Config file name inside the config directory.
pub const CONFIG_FILE: &str = "config.json";

/// State file name inside the data directory.
pub const STATE_FILE: &str = "schedule.json";

/// Platform directories for the app.
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "weekhours", "Weekhours")
}

/// Default location of the config file.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Directory for rolling log files.
pub fn logs_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().join("logs"))
}

/// Settings for the command-line editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the editor state (week, orphans, order) is kept.
    pub state_file: PathBuf,
    /// Log level when `RUST_LOG` is unset.
    pub log_level: String,
    /// Minutes before closing reported as "closing soon".
    pub closing_soon_minutes: u32,
    /// Minutes before opening reported as "opening soon".
    pub opening_soon_minutes: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        let thresholds = StatusThresholds::default();
        Self {
            state_file: project_dirs()
                .map(|dirs| dirs.data_dir().join(STATE_FILE))
                .unwrap_or_else(|| PathBuf::from(STATE_FILE)),
            log_level: "info".to_string(),
            closing_soon_minutes: thresholds.closing_soon_minutes,
            opening_soon_minutes: thresholds.opening_soon_minutes,
        }
    }
}

impl AppConfig {
    /// Loads config from `path`, falling back to defaults if it is absent.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid config {}", path.display()))
    }

    /// Loads from the platform config path, or defaults.
    ///
    /// Runs before logging is set up, so it does not log.
    pub fn load_default() -> anyhow::Result<Self> {
        match default_config_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Opening-status windows from this config.
    pub fn thresholds(&self) -> StatusThresholds {
        StatusThresholds {
            closing_soon_minutes: self.closing_soon_minutes,
            opening_soon_minutes: self.opening_soon_minutes,
        }
    }

    /// Sets the state file.
    pub fn with_state_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_file = path.into();
        self
    }
}
