//! Per-event weather suitability and alternative-date recommendations.

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::events::{event_id, load_event};
use super::AppState;
use crate::db::models::Event;
use crate::errors::{AppError, ErrorResponse};
use crate::services::alternatives::{Alternative, AlternativeDateFinder};
use crate::services::scoring::{self, SuitabilityResult};
use crate::services::weather::WeatherObservation;

#[derive(Debug, Serialize, ToSchema)]
pub struct SuitabilityResponse {
    pub event: Event,
    pub weather: WeatherObservation,
    pub suitability: SuitabilityResult,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AlternativesResponse {
    pub event: Event,
    pub current_weather: WeatherObservation,
    pub current_suitability: SuitabilityResult,
    /// Dates scoring strictly higher than the current one, best first
    pub alternatives: Vec<Alternative>,
}

/// Score the forecast for an event's date and location.
#[utoipa::path(
    get,
    path = "/api/events/{id}/suitability",
    tag = "Suitability",
    params(("id" = Uuid, Path, description = "Event UUID")),
    responses(
        (status = 200, description = "Suitability of the event's date", body = SuitabilityResponse),
        (status = 400, description = "Date outside the forecast range", body = ErrorResponse),
        (status = 404, description = "Event or location not found", body = ErrorResponse),
        (status = 502, description = "Weather provider unavailable", body = ErrorResponse),
    )
)]
pub async fn get_suitability(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<SuitabilityResponse>, AppError> {
    let event = load_event(&state, event_id(path)?).await?;
    let weather = state
        .provider
        .get_forecast(&event.location, event.date)
        .await?;
    let suitability = scoring::score(event.event_type, &weather)?;

    Ok(Json(SuitabilityResponse {
        event,
        weather,
        suitability,
    }))
}

/// Recommend nearby dates with better weather for an event.
///
/// Candidate dates in the past are never considered. Individual candidate
/// failures are skipped; failure to forecast the event's own date is a 502.
#[utoipa::path(
    get,
    path = "/api/events/{id}/alternatives",
    tag = "Suitability",
    params(("id" = Uuid, Path, description = "Event UUID")),
    responses(
        (status = 200, description = "Better dates near the event", body = AlternativesResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 502, description = "Event's own date could not be scored", body = ErrorResponse),
    )
)]
pub async fn get_alternatives(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<AlternativesResponse>, AppError> {
    let event = load_event(&state, event_id(path)?).await?;
    let today = Utc::now().date_naive();

    let search = AlternativeDateFinder::new(state.provider.as_ref(), state.search.clone())
        .find_alternatives(&event, today)
        .await?;

    Ok(Json(AlternativesResponse {
        event,
        current_weather: search.current_weather,
        current_suitability: search.current_suitability,
        alternatives: search.alternatives,
    }))
}
