//! HTTP handlers for harvest and price prediction endpoints
//!
//! Malformed dates are rejected by deserialization and out-of-range
//! coordinates by validation, both before any external call is made.

use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::gdd::{self, GddParams};
use crate::services::PredictionService;
use crate::services::prediction::PredictionResult;
use crate::AppState;

/// Request body for harvest date prediction
#[derive(Debug, Deserialize, Validate)]
pub struct HarvestRequest {
    pub sowing_date: NaiveDate,
    #[validate(range(min = -90.0, max = 90.0, message = "latitude must be within -90..90"))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "longitude must be within -180..180"))]
    pub lon: f64,
}

/// Response body for harvest date prediction
#[derive(Debug, Serialize)]
pub struct HarvestResponse {
    pub sowing_date: NaiveDate,
    pub predicted_harvest_date: NaiveDate,
    pub message: String,
}

/// Predict the harvest date from a sowing date and coordinates
pub async fn predict_harvest(
    State(app): State<AppState>,
    Json(req): Json<HarvestRequest>,
) -> AppResult<Json<HarvestResponse>> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let forecast = app.weather.daily_forecast(req.lat, req.lon).await?;
    let harvest_date = gdd::predict_harvest_date(
        req.sowing_date,
        &forecast,
        &GddParams::from(&app.config.crop),
    );

    Ok(Json(HarvestResponse {
        sowing_date: req.sowing_date,
        predicted_harvest_date: harvest_date,
        message: "Harvest date predicted using GDD model".to_string(),
    }))
}

/// Request body for the combined harvest and price prediction
#[derive(Debug, Deserialize, Validate)]
pub struct PredictAllRequest {
    pub sowing_date: NaiveDate,
    #[validate(range(min = -90.0, max = 90.0, message = "latitude must be within -90..90"))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "longitude must be within -180..180"))]
    pub lon: f64,
    #[validate(length(min = 1, message = "state must not be empty"))]
    pub state: String,
    #[validate(length(min = 1, message = "market must not be empty"))]
    pub market: String,
}

/// Predict the harvest date and the market price at that date.
///
/// Logical failures (lag prices unresolvable) come back as HTTP 200 with an
/// `{error, details}` body; only transport-level failures yield non-200.
pub async fn predict_all(
    State(app): State<AppState>,
    Json(req): Json<PredictAllRequest>,
) -> AppResult<Json<PredictionResult>> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let forecast = app.weather.daily_forecast(req.lat, req.lon).await?;

    let service = PredictionService::new(&app.market, app.model.as_ref(), &app.config);
    let result = service
        .predict_all(
            req.sowing_date,
            &forecast,
            req.state.trim(),
            req.market.trim(),
        )
        .await?;

    Ok(Json(result))
}
