use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::backend::DEFAULT_BASE_URL;
use crate::ui::theme::ThemePreset;

/// Environment variable overriding the backend base URL
pub const BACKEND_URL_ENV: &str = "ATELIER_BACKEND_URL";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub studio: StudioConfig,
    #[serde(default)]
    pub backend: BackendConfig,
}

/// Appearance and behavior settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudioConfig {
    /// Color theme preset
    #[serde(default)]
    pub theme: ThemePreset,
}

/// Backend connection settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the generation backend; None means the default
    #[serde(default)]
    pub url: Option<String>,
}

impl Config {
    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("com", "atelier", "Atelier")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        let config_dir = dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            tracing::info!("Loaded configuration from {:?}", path);
            Ok(config)
        } else {
            tracing::info!("No configuration file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        tracing::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// The backend base URL in effect: environment variable, then config
    /// file, then the built-in default.
    pub fn backend_url(&self) -> String {
        let env_override = std::env::var(BACKEND_URL_ENV).ok();
        resolve_backend_url(env_override.as_deref(), self.backend.url.as_deref())
    }
}

/// Precedence for the base URL; empty strings count as unset
fn resolve_backend_url(env_override: Option<&str>, configured: Option<&str>) -> String {
    env_override
        .filter(|s| !s.trim().is_empty())
        .or(configured.filter(|s| !s.trim().is_empty()))
        .unwrap_or(DEFAULT_BASE_URL)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_override_wins() {
        let url = resolve_backend_url(Some("http://env:9000"), Some("http://cfg:7000"));
        assert_eq!(url, "http://env:9000");
    }

    #[test]
    fn config_url_used_without_env() {
        let url = resolve_backend_url(None, Some("http://cfg:7000"));
        assert_eq!(url, "http://cfg:7000");
    }

    #[test]
    fn defaults_to_localhost() {
        assert_eq!(resolve_backend_url(None, None), "http://localhost:8000");
        // Blank values do not shadow the default
        assert_eq!(resolve_backend_url(Some("  "), Some("")), "http://localhost:8000");
    }

    #[test]
    fn config_round_trips_through_toml() {
        let mut config = Config::default();
        config.backend.url = Some("http://10.0.0.5:8000".to_string());
        config.studio.theme = ThemePreset::Rose;

        let serialized = toml::to_string_pretty(&config).unwrap();
        let restored: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(restored.backend.url.as_deref(), Some("http://10.0.0.5:8000"));
        assert_eq!(restored.studio.theme, ThemePreset::Rose);
    }
}
