use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use super::AppState;
use crate::errors::{AppError, ErrorResponse};
use crate::helpers::parse_iso_date;
use crate::services::weather::WeatherObservation;

#[derive(Debug, Serialize, ToSchema)]
pub struct WeatherResponse {
    pub location: String,
    pub date: NaiveDate,
    pub weather: WeatherObservation,
}

/// Forecast for a location on a date, independent of any event.
#[utoipa::path(
    get,
    path = "/api/weather/{location}/{date}",
    tag = "Weather",
    params(
        ("location" = String, Path, description = "Geocodable location, e.g. \"Zurich\""),
        ("date" = String, Path, description = "Date (YYYY-MM-DD)"),
    ),
    responses(
        (status = 200, description = "Forecast for the date", body = WeatherResponse),
        (
            status = 400,
            description = "Invalid path, invalid date or date outside the forecast range",
            body = ErrorResponse
        ),
        (status = 404, description = "Location not found", body = ErrorResponse),
        (status = 502, description = "Weather provider unavailable", body = ErrorResponse),
    )
)]
pub async fn get_weather(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<WeatherResponse>, AppError> {
    let Path((location, date)) = path.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    let date = parse_iso_date(&date)?;
    let location = location.trim().to_string();
    if location.is_empty() {
        return Err(AppError::InvalidInput("Location must not be empty".to_string()));
    }

    let weather = state.provider.get_forecast(&location, date).await?;

    Ok(Json(WeatherResponse {
        location,
        date,
        weather,
    }))
}
