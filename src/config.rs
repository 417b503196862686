//! Configuration management for the Jowar Harvest & Price Prediction Service
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with JPP_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Weather forecast API configuration
    pub weather: WeatherConfig,

    /// Historical mandi price API configuration
    pub market: MarketConfig,

    /// Crop maturity model parameters
    pub crop: CropConfig,

    /// Price regression model configuration
    pub model: ModelConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Weather API endpoint
    pub api_endpoint: String,

    /// Weather API key
    pub api_key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MarketConfig {
    /// data.gov.in API endpoint
    pub api_endpoint: String,

    /// data.gov.in API key
    pub api_key: String,

    /// AGMARKNET daily mandi price resource identifier
    pub resource_id: String,

    /// Commodity name used in price lookups
    pub commodity: String,

    /// Lag value fed to the regression model when history is unavailable
    pub placeholder_lag_price: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CropConfig {
    /// Base temperature for Jowar (sorghum) in degrees Celsius
    pub base_temp_c: f64,

    /// Cumulative GDD at which the crop is considered ready for harvest
    pub maturity_threshold_gdd: f64,

    /// Daily minimum temperature used once the forecast horizon runs out
    pub fallback_tmin_c: f64,

    /// Daily maximum temperature used once the forecast horizon runs out
    pub fallback_tmax_c: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    /// Path to the serialized price regression artifact
    pub artifact_path: String,
}

impl Config {
    /// Load configuration from files and environment variables
    ///
    /// `server.host` and `server.port` together form the bind address.
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("JPP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("weather.api_endpoint", "https://api.openweathermap.org/data/2.5")?
            .set_default("weather.api_key", "")?
            .set_default("market.api_endpoint", "https://api.data.gov.in/resource")?
            .set_default("market.api_key", "")?
            .set_default("market.resource_id", "9ef84268-d588-465a-a308-a864a43d0070")?
            .set_default("market.commodity", "Jowar")?
            .set_default("market.placeholder_lag_price", 3000.0)?
            .set_default("crop.base_temp_c", 10.0)?
            .set_default("crop.maturity_threshold_gdd", 1650.0)?
            .set_default("crop.fallback_tmin_c", 20.0)?
            .set_default("crop.fallback_tmax_c", 32.0)?
            .set_default("model.artifact_path", "price_model.json")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (JPP_ prefix)
            .add_source(
                Environment::with_prefix("JPP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    #[test]
    fn test_default_bind_address_parses() {
        let config = Config::load().unwrap();
        let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .unwrap();
        assert_eq!(addr.port(), config.server.port);
    }

    #[test]
    fn test_defaults_match_documented_constants() {
        let config = Config::load().unwrap();
        assert_eq!(config.crop.base_temp_c, 10.0);
        assert_eq!(config.crop.maturity_threshold_gdd, 1650.0);
        assert_eq!(config.crop.fallback_tmin_c, 20.0);
        assert_eq!(config.crop.fallback_tmax_c, 32.0);
        assert_eq!(config.market.placeholder_lag_price, 3000.0);
        assert_eq!(config.market.commodity, "Jowar");
    }
}
