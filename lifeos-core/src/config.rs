use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    dashboard::{DashboardProfile, ScheduleItem},
    metrics::dates::parse_date,
    provider::openweather::{Coordinates, DEFAULT_BASE_URL},
};

pub const ENV_WEATHER_API_KEY: &str = "LIFEOS_WEATHER_API_KEY";
pub const ENV_STORAGE_URL: &str = "LIFEOS_STORAGE_URL";
pub const ENV_STORAGE_KEY: &str = "LIFEOS_STORAGE_KEY";

const DEFAULT_USER_NAME: &str = "there";

/// OpenWeather credentials and location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherConfig {
    pub api_key: String,
    pub base_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl WeatherConfig {
    pub fn new(api_key: String) -> Self {
        Self { api_key, base_url: None, latitude: None, longitude: None }
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Configured coordinates, falling back to the default location per axis.
    pub fn location(&self) -> Coordinates {
        let default = Coordinates::default();
        Coordinates {
            latitude: self.latitude.unwrap_or(default.latitude),
            longitude: self.longitude.unwrap_or(default.longitude),
        }
    }
}

/// Hosted habit table endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Project URL, e.g. `https://abcd.supabase.co`.
    pub url: String,
    pub api_key: String,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// user_name = "Alex"
/// target_date = "2026-12-31"
///
/// [weather]
/// api_key = "..."
///
/// [storage]
/// url = "https://abcd.supabase.co"
/// api_key = "..."
///
/// [[schedule]]
/// time = "08:00"
/// title = "Morning Routine"
/// category = "HEALTH"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    pub user_name: Option<String>,

    /// Countdown target, `YYYY-MM-DD`. Defaults to Dec 31 of the current year.
    pub target_date: Option<String>,

    /// Title of today's workout card.
    pub workout: Option<String>,

    pub weather: Option<WeatherConfig>,

    pub storage: Option<StorageConfig>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schedule: Vec<ScheduleItem>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let cfg = Self::load_raw()?;
        cfg.validate().with_context(|| {
            format!(
                "Invalid config file: {}\n\
                 Hint: run `lifeos configure profile` to fix it.",
                Self::config_file_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default()
            )
        })?;
        Ok(cfg)
    }

    /// Load config from disk without validating values, so a broken file can
    /// still be edited through `lifeos configure`.
    pub fn load_raw() -> Result<Self> {
        Self::load_raw_from(&Self::config_file_path()?)
    }

    pub fn load_raw_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "lifeos", "lifeos")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Reject values that would only fail later, mid-render.
    pub fn validate(&self) -> Result<()> {
        self.target_date()?;

        for item in &self.schedule {
            item.starts_at()
                .with_context(|| format!("Invalid schedule entry '{}'", item.title))?;
        }

        Ok(())
    }

    /// Overlay credentials from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_WEATHER_API_KEY).filter(|v| !v.is_empty()) {
            self.set_weather_api_key(key);
        }

        let url = lookup(ENV_STORAGE_URL).filter(|v| !v.is_empty());
        let key = lookup(ENV_STORAGE_KEY).filter(|v| !v.is_empty());
        if let Some(storage) = &mut self.storage {
            if let Some(url) = url {
                storage.url = url;
            }
            if let Some(key) = key {
                storage.api_key = key;
            }
        } else if let (Some(url), Some(api_key)) = (url, key) {
            self.storage = Some(StorageConfig { url, api_key });
        }
    }

    /// Set/replace the weather API key, keeping any configured location.
    pub fn set_weather_api_key(&mut self, api_key: String) {
        match &mut self.weather {
            Some(weather) => weather.api_key = api_key,
            None => self.weather = Some(WeatherConfig::new(api_key)),
        }
    }

    pub fn weather_config(&self) -> Result<&WeatherConfig> {
        self.weather.as_ref().ok_or_else(|| {
            anyhow!(
                "No weather API key configured.\n\
                 Hint: run `lifeos configure weather` or set {ENV_WEATHER_API_KEY}."
            )
        })
    }

    pub fn storage_config(&self) -> Result<&StorageConfig> {
        self.storage.as_ref().ok_or_else(|| {
            anyhow!(
                "No habit storage configured.\n\
                 Hint: run `lifeos configure storage` or set {ENV_STORAGE_URL} and {ENV_STORAGE_KEY}."
            )
        })
    }

    pub fn target_date(&self) -> Result<Option<NaiveDate>> {
        self.target_date
            .as_deref()
            .map(parse_date)
            .transpose()
            .context("Invalid target_date in config")
    }

    /// Everything the dashboard needs from config besides credentials.
    pub fn profile(&self) -> Result<DashboardProfile> {
        Ok(DashboardProfile {
            user_name: self.user_name.clone().unwrap_or_else(|| DEFAULT_USER_NAME.to_string()),
            target_date: self.target_date()?,
            schedule: self.schedule.clone(),
            workout: self.workout.clone(),
        })
    }
}
