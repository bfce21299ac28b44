//! Configuration management for the `Gustwatch` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::GustError;
use crate::models::PropertyConfig;
use crate::weather::met_office::{DATAHUB_URL, Route};
use crate::weather::postcodes::POSTCODES_URL;
use anyhow::{Context, Result};
use chrono::Duration;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable the provider key is read from when no config value is set
pub const API_KEY_ENV: &str = "METOFFICE_API_KEY";

/// Root configuration structure for the `Gustwatch` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GustWatchConfig {
    /// Weather provider configuration
    pub weather: WeatherConfig,
    /// Postcode geocoder configuration
    pub geocoding: GeocodingConfig,
    /// Display windows
    pub monitor: MonitorConfig,
    /// Proxy/API server settings
    pub server: ServerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Monitored properties
    pub properties: Vec<PropertyConfig>,
}

/// Weather provider configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Met Office DataHub API key
    pub api_key: Option<String>,
    /// Base URL for the site-specific point API
    pub base_url: String,
    /// When set, requests go through this proxy instead of DataHub
    pub proxy_url: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
}

/// Geocoder configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingConfig {
    /// Base URL of the postcode lookup endpoint
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
}

/// How far ahead forecast records are considered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ForecastHorizon {
    #[default]
    #[serde(rename = "48h")]
    FortyEightHours,
    #[serde(rename = "five-days")]
    FiveDays,
}

impl ForecastHorizon {
    #[must_use]
    pub fn duration(self) -> Duration {
        match self {
            ForecastHorizon::FortyEightHours => Duration::hours(48),
            ForecastHorizon::FiveDays => Duration::days(5),
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ForecastHorizon::FortyEightHours => "the next 48 hours",
            ForecastHorizon::FiveDays => "the next 5 days",
        }
    }
}

/// Display window settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Forecast horizon for summaries and alerts
    pub forecast_horizon: ForecastHorizon,
    /// Hours either side of now shown in the chart series
    pub chart_span_hours: u32,
}

impl MonitorConfig {
    #[must_use]
    pub fn chart_span(&self) -> Duration {
        Duration::hours(i64::from(self.chart_span_hours))
    }
}

/// Proxy/API server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub bind: String,
    /// Port to listen on
    pub port: u16,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

// Default value functions
fn default_weather_base_url() -> String {
    DATAHUB_URL.to_string()
}

fn default_geocoding_base_url() -> String {
    POSTCODES_URL.to_string()
}

fn default_timeout() -> u32 {
    15
}

fn default_chart_span_hours() -> u32 {
    48
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            proxy_url: None,
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            forecast_horizon: ForecastHorizon::default(),
            chart_span_hours: default_chart_span_hours(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl WeatherConfig {
    #[must_use]
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(u64::from(self.timeout_seconds))
    }

    /// Proxy when a proxy URL is configured, otherwise direct with the key
    #[must_use]
    pub fn route(&self) -> Route {
        match &self.proxy_url {
            Some(proxy_url) => Route::Proxy {
                proxy_url: proxy_url.clone(),
            },
            None => Route::Direct {
                base_url: self.base_url.trim_end_matches('/').to_string(),
                api_key: self.api_key.clone(),
            },
        }
    }
}

impl GeocodingConfig {
    #[must_use]
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(u64::from(self.timeout_seconds))
    }
}

impl GustWatchConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // GUSTWATCH_WEATHER__PROXY_URL -> weather.proxy_url
        builder = builder.add_source(
            Environment::with_prefix("GUSTWATCH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: GustWatchConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config = config.with_api_key_fallback(std::env::var(API_KEY_ENV).ok());
        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("gustwatch").join("config.toml"))
    }

    /// Use `fallback` as the API key when none is configured
    #[must_use]
    pub fn with_api_key_fallback(mut self, fallback: Option<String>) -> Self {
        if self.weather.api_key.is_none() {
            self.weather.api_key = fallback;
        }
        self
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self
            .weather
            .api_key
            .as_ref()
            .is_some_and(|key| key.trim().is_empty())
        {
            self.weather.api_key = None;
        }
        if self
            .weather
            .proxy_url
            .as_ref()
            .is_some_and(|url| url.trim().is_empty())
        {
            self.weather.proxy_url = None;
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_timeout();
        }
        if self.geocoding.base_url.is_empty() {
            self.geocoding.base_url = default_geocoding_base_url();
        }
        if self.geocoding.timeout_seconds == 0 {
            self.geocoding.timeout_seconds = default_timeout();
        }
        if self.monitor.chart_span_hours == 0 {
            self.monitor.chart_span_hours = default_chart_span_hours();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.properties.is_empty() {
            self.properties = PropertyConfig::defaults();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.validate_properties()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds > 300 || self.geocoding.timeout_seconds > 300 {
            return Err(GustError::config("Request timeout cannot exceed 300 seconds").into());
        }

        if self.monitor.chart_span_hours > 168 {
            return Err(GustError::config("Chart span cannot exceed 168 hours (1 week)").into());
        }

        if self.server.port == 0 {
            return Err(GustError::config("Server port must be non-zero").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(GustError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(GustError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let urls = [
            ("Weather API base URL", Some(&self.weather.base_url)),
            ("Weather proxy URL", self.weather.proxy_url.as_ref()),
            ("Geocoding base URL", Some(&self.geocoding.base_url)),
        ];
        for (name, url) in urls {
            let invalid = url.is_some_and(|url| {
                !url.starts_with("http://") && !url.starts_with("https://")
            });
            if invalid {
                return Err(
                    GustError::config(format!("{name} must be a valid HTTP or HTTPS URL")).into(),
                );
            }
        }

        Ok(())
    }

    /// Every property needs a name and a postcode
    fn validate_properties(&self) -> Result<()> {
        for property in &self.properties {
            if property.name.trim().is_empty() || property.postcode.trim().is_empty() {
                return Err(GustError::config(
                    "Each property needs a non-empty name and postcode",
                )
                .into());
            }
        }
        Ok(())
    }
}
