//! Business logic services for the Jowar Harvest & Price Prediction Service

pub mod gdd;
pub mod lag_prices;
pub mod prediction;

pub use lag_prices::LagPriceResolver;
pub use prediction::PredictionService;
