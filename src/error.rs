//! Error handling for the Jowar Harvest & Price Prediction Service
//!
//! Transport-level failures map to non-2xx responses; a lag price resolution
//! failure is a logical error the caller inspects in a 200 body, matching the
//! contract of the original prediction endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Boundary errors
    #[error("Validation error: {0}")]
    Validation(String),

    // External service errors
    #[error("Weather service error: {0}")]
    WeatherService(String),

    #[error("Market data service error: {0}")]
    MarketService(String),

    // Business logic errors
    #[error("Lag price resolution failed: {message}")]
    LagPriceResolution {
        message: String,
        details: Option<String>,
    },

    #[error("Price predictor error: {0}")]
    Predictor(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// Body returned for logical failures on the prediction endpoint. The status
/// is 200; callers detect the failure by the presence of the `error` key.
#[derive(Serialize)]
struct LogicalErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        let (status, code, message) = match self {
            AppError::LagPriceResolution { message, details } => {
                return (
                    StatusCode::OK,
                    Json(LogicalErrorBody {
                        error: message,
                        details,
                    }),
                )
                    .into_response();
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            AppError::WeatherService(msg) => {
                (StatusCode::BAD_GATEWAY, "WEATHER_SERVICE_ERROR", msg)
            }
            AppError::MarketService(msg) => (StatusCode::BAD_GATEWAY, "MARKET_SERVICE_ERROR", msg),
            AppError::Predictor(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "PREDICTOR_ERROR", msg),
            AppError::Configuration(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION_ERROR", msg)
            }
            AppError::Internal(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
            ),
        };

        (
            status,
            Json(ErrorResponse {
                error: ErrorDetail {
                    code: code.to_string(),
                    message,
                },
            }),
        )
            .into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
