//! Event persistence.
//!
//! `MemoryEventStore` keeps events in-process and is used when no database is
//! configured. `PgEventStore` persists them in PostgreSQL via `queries`.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{Event, EventChanges, NewEvent};
use super::queries;
use crate::errors::AppError;

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Short backend name reported by the health check.
    fn backend(&self) -> &'static str;

    /// All events, ordered by date then creation time.
    async fn list(&self) -> Result<Vec<Event>, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<Event>, AppError>;

    async fn insert(&self, new: NewEvent) -> Result<Event, AppError>;

    async fn update(&self, id: Uuid, changes: EventChanges) -> Result<Option<Event>, AppError>;

    async fn delete(&self, id: Uuid) -> Result<Option<Event>, AppError>;

    async fn count(&self) -> Result<usize, AppError>;
}

/// In-process store.
#[derive(Default)]
pub struct MemoryEventStore {
    events: RwLock<HashMap<Uuid, Event>>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list(&self) -> Result<Vec<Event>, AppError> {
        let mut events: Vec<Event> = self.events.read().await.values().cloned().collect();
        events.sort_by(|a, b| (a.date, a.created_at, a.id).cmp(&(b.date, b.created_at, b.id)));
        Ok(events)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Event>, AppError> {
        Ok(self.events.read().await.get(&id).cloned())
    }

    async fn insert(&self, new: NewEvent) -> Result<Event, AppError> {
        let event = Event::create(new, Utc::now());
        self.events.write().await.insert(event.id, event.clone());
        Ok(event)
    }

    async fn update(&self, id: Uuid, changes: EventChanges) -> Result<Option<Event>, AppError> {
        let mut events = self.events.write().await;
        Ok(events.get_mut(&id).map(|event| {
            event.apply(changes, Utc::now());
            event.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Event>, AppError> {
        Ok(self.events.write().await.remove(&id))
    }

    async fn count(&self) -> Result<usize, AppError> {
        Ok(self.events.read().await.len())
    }
}

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn list(&self) -> Result<Vec<Event>, AppError> {
        queries::list_events(&self.pool)
            .await?
            .into_iter()
            .map(Event::try_from)
            .collect()
    }

    async fn get(&self, id: Uuid) -> Result<Option<Event>, AppError> {
        queries::get_event(&self.pool, id)
            .await?
            .map(Event::try_from)
            .transpose()
    }

    async fn insert(&self, new: NewEvent) -> Result<Event, AppError> {
        let event = Event::create(new, Utc::now());
        let row = queries::insert_event(&self.pool, &event).await?;
        Event::try_from(row)
    }

    async fn update(&self, id: Uuid, changes: EventChanges) -> Result<Option<Event>, AppError> {
        queries::update_event(&self.pool, id, &changes, Utc::now())
            .await?
            .map(Event::try_from)
            .transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Event>, AppError> {
        queries::delete_event(&self.pool, id)
            .await?
            .map(Event::try_from)
            .transpose()
    }

    async fn count(&self) -> Result<usize, AppError> {
        let n = queries::count_events(&self.pool).await?;
        Ok(usize::try_from(n).unwrap_or_default())
    }
}
