use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";
pub const DEFAULT_CITY: &str = "Jalna";
pub const DEFAULT_FORECAST_DAYS: u8 = 7;
pub const DEFAULT_DEBOUNCE_MS: u64 = 1200;
pub const DEFAULT_MIN_QUERY_LEN: usize = 3;
pub const DEFAULT_LOCALE: &str = "en_US";

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "WEATHER_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_city = "Jalna"
/// forecast_days = 7
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    pub default_city: String,
    pub forecast_days: u8,
    pub search_debounce_ms: u64,
    /// Shortest query (in characters) that triggers a location search.
    pub min_query_len: usize,
    /// Locale used for weekday names, e.g. "en_US" or "de_DE".
    pub locale: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            default_city: DEFAULT_CITY.to_string(),
            forecast_days: DEFAULT_FORECAST_DAYS,
            search_debounce_ms: DEFAULT_DEBOUNCE_MS,
            min_query_len: DEFAULT_MIN_QUERY_LEN,
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
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

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "weather-task", "weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Directory for the interactive screen's log file.
    pub fn data_dir() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }

    /// API key from the environment, falling back to the stored one.
    pub fn resolved_api_key(&self) -> Result<String> {
        let from_env = std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty());
        self.api_key_with_override(from_env)
    }

    fn api_key_with_override(&self, from_env: Option<String>) -> Result<String> {
        from_env
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
            .ok_or_else(|| {
                anyhow!(
                    "No API key configured.\n\
                     Hint: run `weather configure` or set {API_KEY_ENV}."
                )
            })
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}
