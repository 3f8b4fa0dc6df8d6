// Event Planner API v0.1
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod db;
mod errors;
mod helpers;
mod routes;
mod services;
#[cfg(test)]
mod test_support;

use config::{AppConfig, LogFormat};
use db::store::{EventStore, MemoryEventStore, PgEventStore};
use routes::AppState;
use services::alternatives::SearchWindow;
use services::openweather::OpenWeatherClient;
use services::weather::CachedWeatherProvider;

/// Maximum number of connections in the database pool.
const DB_POOL_MAX_CONNECTIONS: u32 = 5;
/// Minimum number of connections kept alive in the database pool.
const DB_POOL_MIN_CONNECTIONS: u32 = 2;
/// How often expired forecasts are dropped from the weather cache.
const CACHE_EVICTION_INTERVAL_SECS: u64 = 600;

/// Event Planner API OpenAPI document.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Event Planner API",
        version = "0.1.0",
        description = "Weather-aware event planning. Stores outdoor events, scores the \
            forecast for each event's date against rules for its event type, and \
            recommends nearby dates with better weather.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Events", description = "Event management"),
        (name = "Suitability", description = "Weather suitability and alternative dates"),
        (name = "Weather", description = "Raw forecast lookup"),
    ),
    paths(
        routes::health::health_check,
        routes::events::list_events,
        routes::events::create_event,
        routes::events::update_event,
        routes::events::delete_event,
        routes::suitability::get_suitability,
        routes::suitability::get_alternatives,
        routes::weather::get_weather,
    ),
    components(
        schemas(
            routes::health::HealthResponse,
            routes::events::CreateEventRequest,
            routes::events::UpdateEventRequest,
            routes::events::EventWithWeather,
            routes::events::EventListResponse,
            routes::events::EventMessageResponse,
            routes::suitability::SuitabilityResponse,
            routes::suitability::AlternativesResponse,
            routes::weather::WeatherResponse,
            db::models::Event,
            services::scoring::EventType,
            services::scoring::Rating,
            services::scoring::FactorValue,
            services::scoring::FactorDetail,
            services::scoring::SuitabilityResult,
            services::weather::WeatherObservation,
            services::alternatives::Alternative,
            errors::ErrorResponse,
        )
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env().expect("Invalid configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "event_planner_api=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    // Event storage: PostgreSQL when configured, otherwise in-process
    let store: Arc<dyn EventStore> = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(DB_POOL_MAX_CONNECTIONS)
                .min_connections(DB_POOL_MIN_CONNECTIONS)
                .connect(url)
                .await
                .expect("Failed to connect to database");

            sqlx::migrate!()
                .run(&pool)
                .await
                .expect("Failed to run database migrations");

            tracing::info!("Database migrations completed");
            Arc::new(PgEventStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, events are kept in memory and lost on restart");
            Arc::new(MemoryEventStore::new())
        }
    };

    // Weather provider with TTL cache
    if config.openweather_api_key.is_none() {
        tracing::warn!("OPENWEATHER_API_KEY not set, forecast lookups will fail");
    }
    let client = OpenWeatherClient::new(
        &config.openweather_base_url,
        config.openweather_api_key.clone(),
        config.weather_timeout,
    )
    .expect("Failed to build HTTP client")
    .with_forecast_ttl(config.weather_cache_ttl);
    let provider = Arc::new(CachedWeatherProvider::new(client, config.weather_cache_ttl));

    let cache = provider.clone();
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(CACHE_EVICTION_INTERVAL_SECS));
        loop {
            interval.tick().await;
            let evicted = cache.evict_expired().await;
            let locations = cache.inner().evict_expired_forecasts().await;
            if evicted > 0 || locations > 0 {
                tracing::debug!(
                    "Evicted {} expired observations and {} location forecasts from cache",
                    evicted,
                    locations
                );
            }
        }
    });

    let app_state = AppState {
        store,
        provider,
        search: SearchWindow {
            days_before: config.alternative_window_days,
            days_after: config.alternative_window_days,
            limit: config.alternative_limit,
            fetch_timeout: config.weather_timeout,
        },
    };

    // CORS: the browser front-end performs full CRUD
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
        ])
        .allow_headers(Any);

    let app = routes::router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("API server listening on {}", addr);
    tracing::info!(
        "Swagger UI available at http://localhost:{}/swagger-ui/",
        config.port
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind TCP listener");
    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");
}
