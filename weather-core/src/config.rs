use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Top-level configuration stored on disk. Every field is optional in the file.
///
/// Example TOML:
/// ```toml
/// language = "de"
/// debounce_ms = 250
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub geocoding_url: String,
    pub forecast_url: String,

    /// Language for place names returned by geocoding.
    pub language: String,

    /// Maximum number of suggestions per lookup.
    pub suggestion_count: usize,

    /// Quiet period after the last keystroke before a lookup fires.
    pub debounce_ms: u64,

    /// Shorter inputs clear suggestions without a lookup.
    pub min_query_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            language: "en".to_string(),
            suggestion_count: 5,
            debounce_ms: 300,
            min_query_chars: 2,
        }
    }
}

impl Config {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.geocoding_url.trim().is_empty() {
            bail!("Config field geocoding_url must not be empty");
        }
        if self.forecast_url.trim().is_empty() {
            bail!("Config field forecast_url must not be empty");
        }
        if !(1..=100).contains(&self.suggestion_count) {
            bail!(
                "Config field suggestion_count must be between 1 and 100, got {}",
                self.suggestion_count
            );
        }
        if self.min_query_chars == 0 {
            bail!("Config field min_query_chars must be at least 1");
        }
        Ok(())
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
