//! External API integrations

pub mod market;
pub mod weather;

pub use market::MarketClient;
pub use weather::WeatherClient;
