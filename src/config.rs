use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PREFERENCES_PATH: &str = "estate-pilot-preferences.json";

/// Top-level configuration for the client.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub preferences: PreferencesConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let base_url = env::var("ESTATE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidApiUrl(base_url));
        }

        let timeout_secs = match env::var("ESTATE_HTTP_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidTimeout(raw))?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let path = env::var("ESTATE_PREFERENCES_PATH")
            .unwrap_or_else(|_| DEFAULT_PREFERENCES_PATH.to_string());

        let prefers_color_scheme = match env::var("ESTATE_PREFERS_COLOR_SCHEME") {
            Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "dark" => Some(true),
                "light" => Some(false),
                "" => None,
                _ => return Err(ConfigError::InvalidColorScheme(raw)),
            },
            Err(_) => None,
        };

        let log_level = env::var("ESTATE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            api: ApiConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
            preferences: PreferencesConfig {
                path: PathBuf::from(path),
                prefers_dark: prefers_color_scheme,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Remote listing API settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

/// Where the theme preference lives and what the host reports as its colour scheme.
#[derive(Debug, Clone)]
pub struct PreferencesConfig {
    pub path: PathBuf,
    pub prefers_dark: Option<bool>,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("ESTATE_API_URL must be an http(s) URL, got '{0}'")]
    InvalidApiUrl(String),
    #[error("ESTATE_HTTP_TIMEOUT_SECS must be a positive integer, got '{0}'")]
    InvalidTimeout(String),
    #[error("ESTATE_PREFERS_COLOR_SCHEME must be 'dark' or 'light', got '{0}'")]
    InvalidColorScheme(String),
}
