use std::str::FromStr;
use std::time::Duration;

/// Default OpenWeatherMap API root.
const DEFAULT_OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration, parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// PostgreSQL URL. When absent, events are kept in memory.
    pub database_url: Option<String>,
    pub openweather_api_key: Option<String>,
    pub openweather_base_url: String,
    pub weather_cache_ttl: Duration,
    pub weather_timeout: Duration,
    /// Days searched on each side of an event's date for alternatives.
    pub alternative_window_days: u32,
    pub alternative_limit: usize,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let log_format = match optional("LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "LOG_FORMAT",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            port: parsed("PORT", 8000)?,
            database_url: optional("DATABASE_URL"),
            openweather_api_key: optional("OPENWEATHER_API_KEY"),
            openweather_base_url: optional("OPENWEATHER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENWEATHER_BASE_URL.to_string()),
            weather_cache_ttl: Duration::from_secs(parsed("WEATHER_CACHE_TTL_SECS", 21_600)?),
            weather_timeout: Duration::from_secs(parsed("WEATHER_TIMEOUT_SECS", 10)?),
            alternative_window_days: parsed("ALTERNATIVE_WINDOW_DAYS", 3)?,
            alternative_limit: parsed("ALTERNATIVE_LIMIT", 5)?,
            log_format,
        })
    }
}

/// Read an env var, treating empty values as unset.
fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match optional(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
