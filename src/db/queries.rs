use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{Event, EventChanges, EventRow};

const EVENT_COLUMNS: &str = "id, name, event_type, location, date, created_at, updated_at";

/// List all events, soonest first.
pub async fn list_events(pool: &PgPool) -> Result<Vec<EventRow>, sqlx::Error> {
    sqlx::query_as::<_, EventRow>(&format!(
        "SELECT {EVENT_COLUMNS} FROM events ORDER BY date, created_at"
    ))
    .fetch_all(pool)
    .await
}

/// Get a single event by ID.
pub async fn get_event(pool: &PgPool, id: Uuid) -> Result<Option<EventRow>, sqlx::Error> {
    sqlx::query_as::<_, EventRow>(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Insert a fully-formed event.
pub async fn insert_event(pool: &PgPool, event: &Event) -> Result<EventRow, sqlx::Error> {
    sqlx::query_as::<_, EventRow>(&format!(
        "INSERT INTO events (id, name, event_type, location, date, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING {EVENT_COLUMNS}"
    ))
    .bind(event.id)
    .bind(&event.name)
    .bind(event.event_type.as_str())
    .bind(&event.location)
    .bind(event.date)
    .bind(event.created_at)
    .fetch_one(pool)
    .await
}

/// Apply a partial update. Returns `None` if the event does not exist.
pub async fn update_event(
    pool: &PgPool,
    id: Uuid,
    changes: &EventChanges,
    updated_at: DateTime<Utc>,
) -> Result<Option<EventRow>, sqlx::Error> {
    sqlx::query_as::<_, EventRow>(&format!(
        "UPDATE events SET
             name = COALESCE($2, name),
             event_type = COALESCE($3, event_type),
             location = COALESCE($4, location),
             date = COALESCE($5, date),
             updated_at = $6
         WHERE id = $1
         RETURNING {EVENT_COLUMNS}"
    ))
    .bind(id)
    .bind(changes.name.as_deref())
    .bind(changes.event_type.map(|t| t.as_str()))
    .bind(changes.location.as_deref())
    .bind(changes.date)
    .bind(updated_at)
    .fetch_optional(pool)
    .await
}

/// Delete an event, returning the removed row.
pub async fn delete_event(pool: &PgPool, id: Uuid) -> Result<Option<EventRow>, sqlx::Error> {
    sqlx::query_as::<_, EventRow>(&format!(
        "DELETE FROM events WHERE id = $1 RETURNING {EVENT_COLUMNS}"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn count_events(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM events")
        .fetch_one(pool)
        .await
}
