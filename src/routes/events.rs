//! Event CRUD endpoints.
//!
//! - GET    /api/events
//! - POST   /api/events
//! - PUT    /api/events/:id
//! - DELETE /api/events/:id

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::AppState;
use crate::db::models::{Event, EventChanges, NewEvent};
use crate::errors::{AppError, ErrorResponse};
use crate::helpers::parse_iso_date;
use crate::services::scoring::{self, EventType, SuitabilityResult};
use crate::services::weather::WeatherObservation;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Body of POST /api/events. All fields are required.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    pub name: Option<String>,
    /// One of "sports", "formal", "adventure", "picnic"
    pub event_type: Option<String>,
    pub location: Option<String>,
    /// Event date (YYYY-MM-DD)
    pub date: Option<String>,
}

/// Body of PUT /api/events/:id. Omitted fields are left unchanged.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEventRequest {
    pub name: Option<String>,
    pub event_type: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// An event with its forecast and suitability, when a forecast is available.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventWithWeather {
    #[serde(flatten)]
    pub event: Event,
    pub weather: Option<WeatherObservation>,
    pub suitability: Option<SuitabilityResult>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EventListResponse {
    pub events: Vec<EventWithWeather>,
    pub count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EventMessageResponse {
    pub message: String,
    pub event: Event,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn required(field: &str, value: Option<String>) -> Result<String, AppError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::InvalidInput(format!(
            "Missing required field: {}",
            field
        ))),
    }
}

fn non_blank(field: &str, value: Option<String>) -> Result<Option<String>, AppError> {
    value.map(|v| required(field, Some(v))).transpose()
}

fn parse_event_type(s: &str) -> Result<EventType, AppError> {
    s.parse()
        .map_err(|e: scoring::UnknownEventType| AppError::InvalidInput(e.to_string()))
}

impl TryFrom<CreateEventRequest> for NewEvent {
    type Error = AppError;

    fn try_from(req: CreateEventRequest) -> Result<Self, Self::Error> {
        let name = required("name", req.name)?;
        let location = required("location", req.location)?;
        let date = required("date", req.date)?;
        let event_type = required("event_type", req.event_type)?;

        Ok(NewEvent {
            name,
            event_type: parse_event_type(&event_type)?,
            location,
            date: parse_iso_date(&date)?,
        })
    }
}

impl TryFrom<UpdateEventRequest> for EventChanges {
    type Error = AppError;

    fn try_from(req: UpdateEventRequest) -> Result<Self, Self::Error> {
        Ok(EventChanges {
            name: non_blank("name", req.name)?,
            event_type: non_blank("event_type", req.event_type)?
                .map(|t| parse_event_type(&t))
                .transpose()?,
            location: non_blank("location", req.location)?,
            date: non_blank("date", req.date)?
                .map(|d| parse_iso_date(&d))
                .transpose()?,
        })
    }
}

/// Unwrap a JSON body, reporting malformed payloads as `{error}`.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| AppError::InvalidInput(e.body_text()))
}

/// Unwrap an event id path segment.
pub(crate) fn event_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, AppError> {
    path.map(|Path(id)| id)
        .map_err(|e| AppError::InvalidInput(format!("Invalid event id: {}", e.body_text())))
}

/// Resolve an event by ID or fail with 404.
pub(crate) async fn load_event(state: &AppState, id: Uuid) -> Result<Event, AppError> {
    state
        .store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// List all events with their forecast and suitability.
///
/// Forecast lookups run concurrently. Events whose forecast cannot be
/// resolved are still listed, with `weather` and `suitability` set to null.
#[utoipa::path(
    get,
    path = "/api/events",
    tag = "Events",
    responses(
        (status = 200, description = "All events", body = EventListResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
) -> Result<Json<EventListResponse>, AppError> {
    let events = state.store.list().await?;

    let lookups = events.into_iter().map(|event| {
        let provider = state.provider.clone();
        async move {
            let weather = match provider.get_forecast(&event.location, event.date).await {
                Ok(w) => Some(w),
                Err(e) => {
                    tracing::warn!("No forecast for event {}: {}", event.id, e);
                    None
                }
            };
            let suitability = weather.as_ref().and_then(|w| {
                scoring::score(event.event_type, w)
                    .map_err(|e| tracing::warn!("Cannot score event {}: {}", event.id, e))
                    .ok()
            });
            EventWithWeather {
                event,
                weather,
                suitability,
            }
        }
    });
    let events = futures::future::join_all(lookups).await;

    Ok(Json(EventListResponse {
        count: events.len(),
        events,
    }))
}

/// Create an event.
#[utoipa::path(
    post,
    path = "/api/events",
    tag = "Events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = EventMessageResponse),
        (status = 400, description = "Missing or invalid field", body = ErrorResponse),
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<EventMessageResponse>), AppError> {
    let new_event = NewEvent::try_from(json_body(payload)?)?;
    let event = state.store.insert(new_event).await?;

    tracing::info!(
        "Created {} event {} at {} on {}",
        event.event_type,
        event.id,
        event.location,
        event.date
    );

    Ok((
        StatusCode::CREATED,
        Json(EventMessageResponse {
            message: "Event created successfully".to_string(),
            event,
        }),
    ))
}

/// Update an event's name, type, location or date.
#[utoipa::path(
    put,
    path = "/api/events/{id}",
    tag = "Events",
    params(("id" = Uuid, Path, description = "Event UUID")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = EventMessageResponse),
        (status = 400, description = "Invalid field", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn update_event(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateEventRequest>, JsonRejection>,
) -> Result<Json<EventMessageResponse>, AppError> {
    let id = event_id(path)?;
    let changes = EventChanges::try_from(json_body(payload)?)?;

    let event = state
        .store
        .update(id, changes)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    Ok(Json(EventMessageResponse {
        message: "Event updated successfully".to_string(),
        event,
    }))
}

/// Delete an event.
#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    tag = "Events",
    params(("id" = Uuid, Path, description = "Event UUID")),
    responses(
        (status = 200, description = "Event deleted", body = EventMessageResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn delete_event(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<EventMessageResponse>, AppError> {
    let id = event_id(path)?;
    let event = state
        .store
        .delete(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    tracing::info!("Deleted event {}", event.id);

    Ok(Json(EventMessageResponse {
        message: "Event deleted successfully".to_string(),
        event,
    }))
}
