//! Health check handler

use axum::Json;
use serde_json::{json, Value};

/// Health check endpoint for load balancers and monitoring
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "jowar-prediction-backend",
    }))
}
