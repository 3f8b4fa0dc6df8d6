//! Fixtures shared by unit tests.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::db::models::Event;
use crate::services::scoring::EventType;
use crate::services::weather::{WeatherError, WeatherObservation, WeatherProvider};

/// A day in September 2026.
pub(crate) fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, d).unwrap()
}

pub(crate) fn obs(
    temperature: f64,
    wind_speed: f64,
    precipitation: f64,
    humidity: f64,
) -> WeatherObservation {
    WeatherObservation {
        temperature,
        humidity,
        wind_speed,
        precipitation,
        description: "clear sky".to_string(),
        icon: "01d".to_string(),
    }
}

pub(crate) fn sample_event(event_type: EventType, date: NaiveDate) -> Event {
    Event {
        id: Uuid::new_v4(),
        name: "Sample".to_string(),
        event_type,
        location: "Zurich".to_string(),
        date,
        created_at: Utc::now(),
        updated_at: None,
    }
}

pub(crate) enum StubForecast {
    Ok(WeatherObservation),
    Fail(WeatherError),
    /// Never resolves.
    Hang,
}

/// Provider answering from a per-date table. Dates without an entry fall
/// back to `default`, or fail as unavailable.
pub(crate) struct StubProvider {
    forecasts: HashMap<NaiveDate, StubForecast>,
    default: Option<WeatherObservation>,
    requested: Mutex<Vec<NaiveDate>>,
}

impl StubProvider {
    pub(crate) fn new() -> Self {
        Self {
            forecasts: HashMap::new(),
            default: None,
            requested: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with(mut self, date: NaiveDate, forecast: StubForecast) -> Self {
        self.forecasts.insert(date, forecast);
        self
    }

    pub(crate) fn with_default(mut self, weather: WeatherObservation) -> Self {
        self.default = Some(weather);
        self
    }

    pub(crate) fn requested(&self) -> Vec<NaiveDate> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl WeatherProvider for StubProvider {
    async fn get_forecast(
        &self,
        _location: &str,
        date: NaiveDate,
    ) -> Result<WeatherObservation, WeatherError> {
        self.requested.lock().unwrap().push(date);
        match self.forecasts.get(&date) {
            Some(StubForecast::Ok(w)) => Ok(w.clone()),
            Some(StubForecast::Fail(e)) => Err(e.clone()),
            Some(StubForecast::Hang) => std::future::pending().await,
            None => self
                .default
                .clone()
                .ok_or_else(|| WeatherError::ProviderUnavailable(format!("no stub for {}", date))),
        }
    }
}
