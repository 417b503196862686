//! HTTP handlers for the Jowar Harvest & Price Prediction Service

pub mod health;
pub mod prediction;

pub use health::health_check;
pub use prediction::{predict_all, predict_harvest};
