use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::scoring::EventType;

/// Raw `events` row. `event_type` is stored as lowercase text.
#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub name: String,
    pub event_type: String,
    pub location: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A planned event.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Event {
    /// Unique event identifier
    pub id: Uuid,
    /// Event name (e.g. "Team offsite")
    pub name: String,
    pub event_type: EventType,
    /// Free-text, geocodable location (e.g. "Zurich, CH")
    pub location: String,
    /// Calendar date of the event (YYYY-MM-DD)
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    /// Set on the first update
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<EventRow> for Event {
    type Error = AppError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let event_type = row.event_type.parse().map_err(|e| {
            AppError::InternalError(format!("Stored event {} is corrupt: {}", row.id, e))
        })?;
        Ok(Self {
            id: row.id,
            name: row.name,
            event_type,
            location: row.location,
            date: row.date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Validated input for a new event.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: String,
    pub event_type: EventType,
    pub location: String,
    pub date: NaiveDate,
}

/// Validated partial update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct EventChanges {
    pub name: Option<String>,
    pub event_type: Option<EventType>,
    pub location: Option<String>,
    pub date: Option<NaiveDate>,
}

impl Event {
    pub fn create(new: NewEvent, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: new.name,
            event_type: new.event_type,
            location: new.location,
            date: new.date,
            created_at: now,
            updated_at: None,
        }
    }

    pub fn apply(&mut self, changes: EventChanges, now: DateTime<Utc>) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(event_type) = changes.event_type {
            self.event_type = event_type;
        }
        if let Some(location) = changes.location {
            self.location = location;
        }
        if let Some(date) = changes.date {
            self.date = date;
        }
        self.updated_at = Some(now);
    }
}
