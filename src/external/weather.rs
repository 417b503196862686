//! Weather API client for fetching daily forecast data
//!
//! Integrates with the OpenWeatherMap One Call API for daily temperature
//! extremes at a coordinate. The horizon is whatever the provider returns
//! (typically 7-8 days) and may be empty.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Daily temperature extremes in degrees Celsius for one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyTemperature {
    pub min_c: f64,
    pub max_c: f64,
}

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// OpenWeatherMap One Call API response
#[derive(Debug, Deserialize)]
struct OneCallResponse {
    #[serde(default)]
    daily: Vec<OneCallDaily>,
}

#[derive(Debug, Deserialize)]
struct OneCallDaily {
    temp: OneCallTemp,
}

#[derive(Debug, Deserialize)]
struct OneCallTemp {
    min: f64,
    max: f64,
}

impl WeatherClient {
    /// Create a new WeatherClient for the given endpoint
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
        }
    }

    /// Fetch the daily min/max temperature forecast by GPS coordinates.
    ///
    /// The sequence is indexed by day-offset from the present day. Failures
    /// propagate: a harvest date cannot be computed without a forecast.
    pub async fn daily_forecast(&self, lat: f64, lon: f64) -> AppResult<Vec<DailyTemperature>> {
        let url = format!(
            "{}/onecall?lat={}&lon={}&exclude=minutely,hourly,alerts&units=metric&appid={}",
            self.base_url, lat, lon, self.api_key
        );

        let response = self
            .client
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| AppError::WeatherService(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::WeatherService(format!(
                "unexpected status {} - {}",
                status, body
            )));
        }

        let data: OneCallResponse = response
            .json()
            .await
            .map_err(|e| AppError::WeatherService(format!("failed to parse response: {}", e)))?;

        Ok(convert_forecast(data))
    }
}

/// Convert the One Call response to the internal forecast sequence
fn convert_forecast(data: OneCallResponse) -> Vec<DailyTemperature> {
    data.daily
        .into_iter()
        .map(|day| DailyTemperature {
            min_c: day.temp.min,
            max_c: day.temp.max,
        })
        .collect()
}
