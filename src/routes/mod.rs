pub mod events;
pub mod health;
pub mod suitability;
pub mod weather;

use axum::routing::{get, put};
use axum::Router;
use std::sync::Arc;

use crate::db::store::EventStore;
use crate::services::alternatives::SearchWindow;
use crate::services::weather::WeatherProvider;

/// Shared application state for all endpoints.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) store: Arc<dyn EventStore>,
    pub(crate) provider: Arc<dyn WeatherProvider>,
    pub(crate) search: SearchWindow,
}

/// All API routes, without CORS, tracing or Swagger UI.
pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_check))
        .route(
            "/api/events",
            get(events::list_events).post(events::create_event),
        )
        .route(
            "/api/events/:id",
            put(events::update_event).delete(events::delete_event),
        )
        .route(
            "/api/events/:id/suitability",
            get(suitability::get_suitability),
        )
        .route(
            "/api/events/:id/alternatives",
            get(suitability::get_alternatives),
        )
        .route(
            "/api/weather/:location/:date",
            get(weather::get_weather),
        )
        .with_state(state)
}
