//! Console configuration
//!
//! Configuration is stored in `.wfconsole/config.toml` next to the data
//! snapshot. When the data directory has no config file, the user-wide
//! `~/.config/wfconsole/config.toml` is used if present.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::sessions::StatusFilter;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Text rendering of the timeline and tasks views
    #[serde(default)]
    pub display: DisplayConfig,

    /// Sessions list defaults
    #[serde(default)]
    pub sessions: SessionsConfig,

    /// Interactive console settings
    #[serde(default)]
    pub tui: TuiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayConfig {
    /// Spaces per depth level
    #[serde(default = "default_indent_width")]
    pub indent_width: usize,

    /// Show durations of finished tasks in the timeline
    #[serde(default = "default_show_times")]
    pub show_times: bool,
}

fn default_indent_width() -> usize {
    2
}

fn default_show_times() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            indent_width: default_indent_width(),
            show_times: default_show_times(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionsConfig {
    /// Status selected when the sessions list opens ("all", "success", ...)
    #[serde(default = "default_status")]
    pub default_status: String,
}

fn default_status() -> String {
    "all".to_string()
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            default_status: default_status(),
        }
    }
}

impl SessionsConfig {
    pub fn default_filter(&self) -> StatusFilter {
        StatusFilter::from(self.default_status.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TuiConfig {
    /// Input poll interval (milliseconds)
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

fn default_tick_ms() -> u64 {
    250
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
        }
    }
}

impl Config {
    /// Path of the user-wide config file
    pub fn global_path() -> anyhow::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("wfconsole").join("config.toml"))
    }

    /// Load configuration from `<dir>/config.toml`, falling back to the
    /// user-wide file, then to defaults
    pub fn load(data_dir: &Path) -> anyhow::Result<Self> {
        let local = data_dir.join("config.toml");
        if local.exists() {
            return Self::load_file(&local);
        }

        match Self::global_path() {
            Ok(global) if global.exists() => Self::load_file(&global),
            _ => Ok(Self::default()),
        }
    }

    fn load_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))?;

        Ok(config)
    }

    /// Save configuration to `<dir>/config.toml`
    pub fn save(&self, data_dir: &Path) -> anyhow::Result<()> {
        fs::create_dir_all(data_dir)
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {}", data_dir.display(), e))?;

        let content = toml::to_string_pretty(self)
            .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

        fs::write(data_dir.join("config.toml"), content)
            .map_err(|e| anyhow::anyhow!("Failed to write config: {}", e))?;

        Ok(())
    }

    /// Write the default config file if it doesn't exist
    pub fn init(data_dir: &Path) -> anyhow::Result<bool> {
        if data_dir.join("config.toml").exists() {
            return Ok(false);
        }

        Self::default().save(data_dir)?;
        Ok(true)
    }
}
