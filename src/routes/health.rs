use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use super::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status ("ok" when healthy, "degraded" when storage is unreachable)
    pub status: String,
    /// API version
    pub version: String,
    /// Storage backend ("memory" or "postgres")
    pub storage: String,
    /// Number of stored events, absent when storage is unreachable
    pub events_count: Option<usize>,
}

/// Health check endpoint.
///
/// Returns status "degraded" (still 200) if the event store cannot be
/// queried, so load balancers can distinguish partial failures.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let events_count = match state.store.count().await {
        Ok(n) => Some(n),
        Err(e) => {
            tracing::warn!("Health check could not query storage: {}", e);
            None
        }
    };

    Json(HealthResponse {
        status: if events_count.is_some() {
            "ok".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: state.store.backend().to_string(),
        events_count,
    })
}
