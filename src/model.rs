//! Price regression model artifact and predictor interface
//!
//! The trained regressor is consumed as a black box: a feature vector of
//! harvest-date calendar fields plus two lag prices goes in, a price in
//! ₹/quintal comes out. The artifact is a JSON-serialized linear model loaded
//! once at startup and shared read-only across requests.

use std::fs;

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Feature vector consumed by the price regression model
#[derive(Debug, Clone, PartialEq)]
pub struct PriceFeatures {
    pub year: f64,
    pub month: f64,
    pub day: f64,
    /// ISO week number
    pub week: f64,
    pub lag_3: f64,
    pub lag_7: f64,
}

impl PriceFeatures {
    /// Build the feature vector for a calendar date and two lag prices
    pub fn for_date(date: NaiveDate, lag_3: f64, lag_7: f64) -> Self {
        Self {
            year: date.year() as f64,
            month: date.month() as f64,
            day: date.day() as f64,
            week: date.iso_week().week() as f64,
            lag_3,
            lag_7,
        }
    }
}

/// Interface for the price prediction model
///
/// Pure and deterministic for a fixed artifact and fixed input; safe for
/// concurrent invocation across simultaneous requests.
pub trait PricePredictor: Send + Sync {
    fn predict(&self, features: &PriceFeatures) -> AppResult<f64>;
}

/// Linear regression over the price feature vector, loaded from a JSON artifact
#[derive(Debug, Clone, Deserialize)]
pub struct LinearPriceModel {
    intercept: f64,
    coefficients: Coefficients,
}

#[derive(Debug, Clone, Deserialize)]
struct Coefficients {
    year: f64,
    month: f64,
    day: f64,
    week: f64,
    lag_3: f64,
    lag_7: f64,
}

impl LinearPriceModel {
    /// Load the model artifact from disk
    pub fn load(path: &str) -> AppResult<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            AppError::Configuration(format!("failed to read price model artifact {}: {}", path, e))
        })?;
        Self::from_json(&raw)
    }

    /// Parse a model artifact from its JSON representation
    pub fn from_json(raw: &str) -> AppResult<Self> {
        serde_json::from_str(raw)
            .map_err(|e| AppError::Configuration(format!("invalid price model artifact: {}", e)))
    }
}

impl PricePredictor for LinearPriceModel {
    fn predict(&self, features: &PriceFeatures) -> AppResult<f64> {
        let c = &self.coefficients;
        let price = self.intercept
            + c.year * features.year
            + c.month * features.month
            + c.day * features.day
            + c.week * features.week
            + c.lag_3 * features.lag_3
            + c.lag_7 * features.lag_7;

        if !price.is_finite() {
            return Err(AppError::Predictor(format!(
                "model produced a non-finite price for features {:?}",
                features
            )));
        }

        Ok(price)
    }
}
