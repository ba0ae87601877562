//! CLI configuration

use std::path::PathBuf;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;
use amity_core::limits::validate_suggest_depth;
use amity_core::DEFAULT_SUGGEST_DEPTH;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "AMITY_CONFIG";

/// Get default data directory
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("amity")
}

/// Location of the config file
pub fn config_file_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("amity")
        .join("config.toml")
}

/// Persistent CLI settings
///
/// Every field is optional; unset fields fall back to built-in defaults.
/// Command-line flags and environment variables take precedence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggest_depth: Option<u32>,
}

impl Config {
    /// Load the config file; a missing file yields the defaults
    pub fn load() -> anyhow::Result<Self> {
        let path = config_file_path();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_file_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, toml::to_string_pretty(self)?)
            .with_context(|| format!("writing config file {}", path.display()))?;
        Ok(())
    }

    pub fn keys() -> &'static [&'static str] {
        &["data_dir", "format", "suggest_depth"]
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "data_dir" => self.data_dir.as_ref().map(|p| p.display().to_string()),
            "format" => self.format.map(|f| f.to_string()),
            "suggest_depth" => self.suggest_depth.map(|d| d.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "data_dir" => self.data_dir = Some(PathBuf::from(value)),
            "format" => self.format = Some(value.parse()?),
            "suggest_depth" => {
                let depth: u32 = value
                    .parse()
                    .with_context(|| format!("suggest_depth must be a number, got {:?}", value))?;
                validate_suggest_depth(depth)?;
                self.suggest_depth = Some(depth);
            }
            _ => anyhow::bail!(
                "Unknown config key: {} (available: {})",
                key,
                Self::keys().join(", ")
            ),
        }
        Ok(())
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    pub fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }

    pub fn suggest_depth(&self) -> u32 {
        self.suggest_depth.unwrap_or(DEFAULT_SUGGEST_DEPTH)
    }
}
