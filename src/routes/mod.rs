//! Route definitions for the Jowar Harvest & Price Prediction Service

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Harvest date only
        .route("/predict-harvest", post(handlers::predict_harvest))
        // Harvest date plus price
        .route("/predict-all", post(handlers::predict_all))
}
