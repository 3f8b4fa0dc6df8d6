//! OpenWeatherMap 5-day / 3-hour forecast client.
//!
//! See: https://openweathermap.org/forecast5

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Timelike};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::helpers::round_1dp;
use crate::services::weather::{WeatherError, WeatherObservation, WeatherProvider};

/// Seconds from local midnight to local noon; the slot closest to this
/// represents the whole day.
const NOON_SECS: i64 = 12 * 3600;

/// How long a fetched 5-day forecast is reused unless overridden.
const DEFAULT_FORECAST_TTL: Duration = Duration::from_secs(600);

/// Last parsed forecast for one location, with its fetch time.
type ForecastSlot = Arc<Mutex<Option<(Instant, Arc<OwmForecastResponse>)>>>;

/// Client for the OpenWeatherMap forecast API.
///
/// One upstream response covers five days, so parsed responses are kept per
/// location and every date lookup within the TTL is answered from them.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    forecast_ttl: Duration,
    forecasts: Arc<Mutex<HashMap<String, ForecastSlot>>>,
}

// --- OpenWeatherMap JSON response types ---

#[derive(Debug, Deserialize)]
pub struct OwmForecastResponse {
    list: Vec<OwmForecastItem>,
    city: OwmCity,
}

#[derive(Debug, Deserialize)]
struct OwmCity {
    /// Shift in seconds from UTC
    #[serde(default)]
    timezone: i64,
}

#[derive(Debug, Deserialize)]
struct OwmForecastItem {
    dt: i64,
    main: OwmMain,
    #[serde(default)]
    weather: Vec<OwmWeather>,
    wind: OwmWind,
    rain: Option<OwmVolume>,
    snow: Option<OwmVolume>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwmVolume {
    #[serde(rename = "3h")]
    three_hour: Option<f64>,
}

impl OpenWeatherClient {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            forecast_ttl: DEFAULT_FORECAST_TTL,
            forecasts: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    pub fn with_forecast_ttl(mut self, ttl: Duration) -> Self {
        self.forecast_ttl = ttl;
        self
    }

    /// Forecast for a location, fetched at most once per TTL.
    ///
    /// Concurrent lookups for the same location wait on a single upstream
    /// request. Failures are not kept.
    async fn cached_forecast(
        &self,
        location: &str,
    ) -> Result<Arc<OwmForecastResponse>, WeatherError> {
        let slot = {
            let mut forecasts = self.forecasts.lock().await;
            forecasts
                .entry(location.trim().to_lowercase())
                .or_default()
                .clone()
        };

        let mut entry = slot.lock().await;
        if let Some((fetched_at, forecast)) = entry.as_ref() {
            if fetched_at.elapsed() < self.forecast_ttl {
                return Ok(forecast.clone());
            }
        }

        let forecast = Arc::new(self.fetch_forecast(location).await?);
        *entry = Some((Instant::now(), forecast.clone()));
        Ok(forecast)
    }

    /// Drop per-location forecasts older than the TTL.
    pub async fn evict_expired_forecasts(&self) -> usize {
        let mut forecasts = self.forecasts.lock().await;
        let before = forecasts.len();
        forecasts.retain(|_, slot| match slot.try_lock() {
            Ok(entry) => entry
                .as_ref()
                .is_some_and(|(fetched_at, _)| fetched_at.elapsed() < self.forecast_ttl),
            // Fetch in progress
            Err(_) => true,
        });
        before - forecasts.len()
    }

    /// Fetch the full 5-day forecast for a location.
    pub async fn fetch_forecast(
        &self,
        location: &str,
    ) -> Result<OwmForecastResponse, WeatherError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            WeatherError::ProviderUnavailable("OPENWEATHER_API_KEY is not configured".to_string())
        })?;

        let url = format!("{}/forecast", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", location), ("appid", api_key), ("units", "metric")])
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() {
                    "OpenWeatherMap request timed out".to_string()
                } else {
                    format!("OpenWeatherMap request failed: {}", e)
                };
                WeatherError::ProviderUnavailable(reason)
            })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(WeatherError::LocationNotFound(location.to_string()));
        }

        if !response.status().is_success() {
            return Err(WeatherError::ProviderUnavailable(format!(
                "OpenWeatherMap returned HTTP {}",
                response.status()
            )));
        }

        response.json::<OwmForecastResponse>().await.map_err(|e| {
            WeatherError::ProviderUnavailable(format!("OpenWeatherMap JSON parse error: {}", e))
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn get_forecast(
        &self,
        location: &str,
        date: NaiveDate,
    ) -> Result<WeatherObservation, WeatherError> {
        let forecast = self.cached_forecast(location).await?;
        extract_observation(&forecast, date)
    }
}

/// Pick the forecast slot closest to local noon on `date` and convert it.
///
/// Pure function (no I/O). Slot times are shifted by the city's UTC offset
/// before their calendar date is compared.
pub fn extract_observation(
    forecast: &OwmForecastResponse,
    date: NaiveDate,
) -> Result<WeatherObservation, WeatherError> {
    let offset = forecast.city.timezone;

    let closest = forecast
        .list
        .iter()
        .filter_map(|item| {
            let local = DateTime::from_timestamp(item.dt + offset, 0)?.naive_utc();
            (local.date() == date).then(|| {
                let secs = i64::from(local.num_seconds_from_midnight());
                ((secs - NOON_SECS).abs(), item)
            })
        })
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, item)| item)
        .ok_or(WeatherError::DateOutOfRange(date))?;

    Ok(parse_forecast_item(closest))
}

fn parse_forecast_item(item: &OwmForecastItem) -> WeatherObservation {
    let volume = |v: &Option<OwmVolume>| v.as_ref().and_then(|v| v.three_hour).unwrap_or(0.0);
    let (description, icon) = item
        .weather
        .first()
        .map(|w| (w.description.clone(), w.icon.clone()))
        .unwrap_or_else(|| ("unknown".to_string(), String::new()));

    WeatherObservation {
        temperature: round_1dp(item.main.temp),
        humidity: item.main.humidity.round(),
        wind_speed: round_1dp(item.wind.speed),
        precipitation: round_1dp(volume(&item.rain) + volume(&item.snow)),
        description,
        icon,
    }
}
