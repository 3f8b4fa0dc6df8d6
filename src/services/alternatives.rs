//! Alternative-date recommendations.
//!
//! Scores the event's own date as a baseline, then fans out forecast lookups
//! for every candidate date in a window around it. Only candidates that beat
//! the baseline are returned, best first.

use chrono::{Duration as ChronoDuration, NaiveDate};
use serde::Serialize;
use std::cmp::Ordering;
use std::time::Duration;
use utoipa::ToSchema;

use crate::db::models::Event;
use crate::services::scoring::{self, SuitabilityResult};
use crate::services::weather::{WeatherError, WeatherObservation, WeatherProvider};

/// Bounds of an alternative-date search.
#[derive(Debug, Clone)]
pub struct SearchWindow {
    pub days_before: u32,
    pub days_after: u32,
    /// Maximum number of alternatives returned.
    pub limit: usize,
    /// Upper bound for each individual forecast lookup.
    pub fetch_timeout: Duration,
}

impl Default for SearchWindow {
    fn default() -> Self {
        Self {
            days_before: 3,
            days_after: 3,
            limit: 5,
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum FinderError {
    #[error("Cannot score the event's current date: {0}")]
    BaselineUnavailable(String),
}

/// A candidate date that scores better than the event's current date.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Alternative {
    pub date: NaiveDate,
    pub weather: WeatherObservation,
    pub suitability: SuitabilityResult,
}

/// Outcome of a search: the baseline plus ranked improvements.
#[derive(Debug, Clone)]
pub struct AlternativeSearch {
    pub current_weather: WeatherObservation,
    pub current_suitability: SuitabilityResult,
    pub alternatives: Vec<Alternative>,
}

pub struct AlternativeDateFinder<'a> {
    provider: &'a dyn WeatherProvider,
    window: SearchWindow,
}

impl<'a> AlternativeDateFinder<'a> {
    pub fn new(provider: &'a dyn WeatherProvider, window: SearchWindow) -> Self {
        Self { provider, window }
    }

    pub async fn find_alternatives(
        &self,
        event: &Event,
        today: NaiveDate,
    ) -> Result<AlternativeSearch, FinderError> {
        let candidates = candidate_dates(event.date, &self.window, today);

        let baseline = self.fetch(&event.location, event.date);
        let lookups = candidates.iter().map(|&date| async move {
            (date, self.fetch(&event.location, date).await)
        });
        let (baseline, lookups) =
            futures::future::join(baseline, futures::future::join_all(lookups)).await;

        let current_weather =
            baseline.map_err(|e| FinderError::BaselineUnavailable(e.to_string()))?;
        let current_suitability = scoring::score(event.event_type, &current_weather)
            .map_err(|e| FinderError::BaselineUnavailable(e.to_string()))?;
        let baseline_score = current_suitability.score();

        let mut alternatives: Vec<Alternative> = lookups
            .into_iter()
            .filter_map(|(date, result)| {
                let weather = result
                    .map_err(|e| {
                        tracing::warn!(
                            "Skipping alternative {} for event {}: {}",
                            date,
                            event.id,
                            e
                        );
                    })
                    .ok()?;
                let suitability = scoring::score(event.event_type, &weather)
                    .map_err(|e| {
                        tracing::warn!(
                            "Skipping alternative {} for event {}: invalid forecast: {}",
                            date,
                            event.id,
                            e
                        );
                    })
                    .ok()?;
                Some(Alternative {
                    date,
                    weather,
                    suitability,
                })
            })
            .filter(|alt| alt.suitability.score() > baseline_score)
            .collect();

        alternatives.sort_by(|a, b| rank(a, b, event.date));
        alternatives.truncate(self.window.limit);

        tracing::debug!(
            "Event {}: {} candidate dates, {} improvements over baseline score {}",
            event.id,
            candidates.len(),
            alternatives.len(),
            baseline_score
        );

        Ok(AlternativeSearch {
            current_weather,
            current_suitability,
            alternatives,
        })
    }

    /// Single forecast lookup bounded by the window's timeout.
    async fn fetch(
        &self,
        location: &str,
        date: NaiveDate,
    ) -> Result<WeatherObservation, WeatherError> {
        match tokio::time::timeout(
            self.window.fetch_timeout,
            self.provider.get_forecast(location, date),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(WeatherError::ProviderUnavailable(format!(
                "forecast lookup for {} timed out after {:?}",
                date, self.window.fetch_timeout
            ))),
        }
    }
}

/// Dates within the window around `original`, excluding `original` itself and
/// anything before `today`. Ascending.
pub fn candidate_dates(
    original: NaiveDate,
    window: &SearchWindow,
    today: NaiveDate,
) -> Vec<NaiveDate> {
    let before = -i64::from(window.days_before);
    let after = i64::from(window.days_after);

    (before..=after)
        .filter(|&offset| offset != 0)
        .filter_map(|offset| original.checked_add_signed(ChronoDuration::days(offset)))
        .filter(|date| *date >= today)
        .collect()
}

/// Higher score first, then closer to the original date, then earlier.
fn rank(a: &Alternative, b: &Alternative, original: NaiveDate) -> Ordering {
    let distance = |d: NaiveDate| (d - original).num_days().abs();
    b.suitability
        .score()
        .cmp(&a.suitability.score())
        .then_with(|| distance(a.date).cmp(&distance(b.date)))
        .then_with(|| a.date.cmp(&b.date))
}
