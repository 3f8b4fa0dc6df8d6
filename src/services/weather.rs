//! Weather provider contract and the process-wide forecast cache.
//!
//! A `WeatherProvider` resolves one observation per (location, date).
//! `CachedWeatherProvider` wraps any provider and keeps successful lookups for
//! a fixed TTL so repeated calls within a session see consistent values.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use utoipa::ToSchema;

/// A single forecast snapshot for a location on a calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeatherObservation {
    /// Air temperature in Celsius
    pub temperature: f64,
    /// Relative humidity percentage (0–100)
    pub humidity: f64,
    /// Wind speed in metres per second
    pub wind_speed: f64,
    /// Precipitation amount in mm
    pub precipitation: f64,
    /// Human-readable conditions (e.g. "scattered clouds")
    pub description: String,
    /// Provider icon code (e.g. "03d")
    pub icon: String,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum WeatherError {
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("No forecast available for {0}: outside the forecast horizon")]
    DateOutOfRange(NaiveDate),

    #[error("Weather provider unavailable: {0}")]
    ProviderUnavailable(String),
}

/// Source of forecast observations.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn get_forecast(
        &self,
        location: &str,
        date: NaiveDate,
    ) -> Result<WeatherObservation, WeatherError>;
}

/// Cache key: locations compare case- and whitespace-insensitively.
type CacheKey = (String, NaiveDate);

fn cache_key(location: &str, date: NaiveDate) -> CacheKey {
    (location.trim().to_lowercase(), date)
}

/// TTL cache in front of another provider. Failures are never cached.
pub struct CachedWeatherProvider<P> {
    inner: P,
    ttl: Duration,
    entries: RwLock<HashMap<CacheKey, (Instant, WeatherObservation)>>,
}

impl<P: WeatherProvider> CachedWeatherProvider<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Drop entries older than the TTL.
    pub async fn evict_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, (fetched_at, _)| fetched_at.elapsed() < self.ttl);
        before - entries.len()
    }
}

#[async_trait]
impl<P: WeatherProvider> WeatherProvider for CachedWeatherProvider<P> {
    async fn get_forecast(
        &self,
        location: &str,
        date: NaiveDate,
    ) -> Result<WeatherObservation, WeatherError> {
        let key = cache_key(location, date);

        if let Some((fetched_at, obs)) = self.entries.read().await.get(&key) {
            if fetched_at.elapsed() < self.ttl {
                tracing::debug!("Weather cache hit for {} on {}", key.0, date);
                return Ok(obs.clone());
            }
        }

        let obs = self.inner.get_forecast(location, date).await?;
        self.entries
            .write()
            .await
            .insert(key, (Instant::now(), obs.clone()));
        Ok(obs)
    }
}
