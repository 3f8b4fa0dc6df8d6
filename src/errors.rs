use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::services::alternatives::FinderError;
use crate::services::scoring::ScoreError;
use crate::services::weather::WeatherError;

/// Standard error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Weather provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Baseline unavailable: {0}")]
    BaselineUnavailable(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::ProviderUnavailable(_) | AppError::BaselineUnavailable(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::InternalError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::NotFound(msg)
            | AppError::InvalidInput(msg)
            | AppError::ProviderUnavailable(msg)
            | AppError::BaselineUnavailable(msg)
            | AppError::InternalError(msg) => msg,
            AppError::DatabaseError(err) => {
                tracing::error!("Database error: {:?}", err);
                "Internal database error".to_string()
            }
        };

        (status, axum::Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<WeatherError> for AppError {
    fn from(err: WeatherError) -> Self {
        match err {
            WeatherError::LocationNotFound(_) => AppError::NotFound(err.to_string()),
            WeatherError::DateOutOfRange(_) => AppError::InvalidInput(err.to_string()),
            WeatherError::ProviderUnavailable(_) => AppError::ProviderUnavailable(err.to_string()),
        }
    }
}

impl From<ScoreError> for AppError {
    fn from(err: ScoreError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

impl From<FinderError> for AppError {
    fn from(err: FinderError) -> Self {
        match err {
            FinderError::BaselineUnavailable(_) => AppError::BaselineUnavailable(err.to_string()),
        }
    }
}
