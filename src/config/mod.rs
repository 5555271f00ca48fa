use crate::global;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

/// Persistent settings, stored as TOML under the user config directory.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    /// How far back to replay history when no window is given on the
    /// command line, e.g. "5m", "2h", "3d".
    pub default_window: String,
    /// AWS region override. Falls back to the default provider chain.
    pub region: Option<String>,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            default_window: "5m".to_string(),
            region: None,
        }
    }
}

impl TrailConfig {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        global::config_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window_is_five_minutes() {
        let config = TrailConfig::default();
        assert_eq!(config.default_window, "5m");
        assert!(config.region.is_none());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: TrailConfig = toml::from_str("region = \"eu-west-1\"").unwrap();
        assert_eq!(config.default_window, "5m");
        assert_eq!(config.region.as_deref(), Some("eu-west-1"));
    }
}
