//! End-to-end prediction orchestration
//!
//! Sequences harvest estimation, lag price resolution and the final price
//! regression into one request-scoped pipeline. Every external call is
//! single-shot; there are no retries anywhere in the pipeline.

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::external::market::PriceHistory;
use crate::external::weather::DailyTemperature;
use crate::model::{PriceFeatures, PricePredictor};
use crate::services::gdd::{self, GddParams};
use crate::services::lag_prices::LagPriceResolver;

/// Terminal output of the full prediction pipeline
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResult {
    pub sowing_date: NaiveDate,
    pub harvest_date: NaiveDate,
    pub lag_3_price: f64,
    pub lag_7_price: f64,
    pub predicted_price: f64,
    pub state: String,
    pub market: String,
}

/// Prediction pipeline over injected collaborators
pub struct PredictionService<'a, H, P> {
    history: &'a H,
    predictor: &'a P,
    config: &'a Config,
}

impl<'a, H: PriceHistory, P: PricePredictor> PredictionService<'a, H, P> {
    pub fn new(history: &'a H, predictor: &'a P, config: &'a Config) -> Self {
        Self {
            history,
            predictor,
            config,
        }
    }

    /// Estimate the harvest date for a sowing date against a daily forecast
    pub fn predict_harvest(
        &self,
        sowing_date: NaiveDate,
        forecast: &[DailyTemperature],
    ) -> NaiveDate {
        gdd::predict_harvest_date(sowing_date, forecast, &GddParams::from(&self.config.crop))
    }

    /// Run the full pipeline: harvest date, lag prices, final price
    pub async fn predict_all(
        &self,
        sowing_date: NaiveDate,
        forecast: &[DailyTemperature],
        state: &str,
        market: &str,
    ) -> AppResult<PredictionResult> {
        let harvest_date = self.predict_harvest(sowing_date, forecast);
        tracing::debug!(%sowing_date, %harvest_date, "harvest date estimated");

        let resolver = LagPriceResolver::new(
            self.history,
            self.predictor,
            &self.config.market.commodity,
            self.config.market.placeholder_lag_price,
        );
        let (lag_3, lag_7) = resolver.resolve(state, market, harvest_date).await?;

        // Unreachable while the model fallback is infallible, but the
        // contract requires a structured failure instead of a bogus price.
        if !lag_3.value.is_finite() || !lag_7.value.is_finite() {
            return Err(AppError::LagPriceResolution {
                message: "Unable to fetch or forecast lag prices for this region/date.".to_string(),
                details: Some("Check market/state names or API key configuration.".to_string()),
            });
        }

        let features = PriceFeatures::for_date(harvest_date, lag_3.value, lag_7.value);
        let predicted_price = self.predictor.predict(&features)?;

        Ok(PredictionResult {
            sowing_date,
            harvest_date,
            lag_3_price: round_to_paise(lag_3.value),
            lag_7_price: round_to_paise(lag_7.value),
            predicted_price: round_to_paise(predicted_price),
            state: state.to_string(),
            market: market.to_string(),
        })
    }
}

/// Currency values leave the pipeline rounded to two decimal places;
/// everything before this point retains full precision
fn round_to_paise(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FakeHistory {
        prices: HashMap<NaiveDate, f64>,
        queried: Mutex<Vec<NaiveDate>>,
    }

    impl PriceHistory for FakeHistory {
        async fn modal_price(
            &self,
            _state: &str,
            _market: &str,
            _commodity: &str,
            date: NaiveDate,
        ) -> AppResult<Option<f64>> {
            self.queried.lock().unwrap().push(date);
            Ok(self.prices.get(&date).copied())
        }
    }

    struct FixedPredictor(f64);

    impl PricePredictor for FixedPredictor {
        fn predict(&self, _features: &PriceFeatures) -> AppResult<f64> {
            Ok(self.0)
        }
    }

    fn test_config() -> Config {
        Config::load().unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn warm_forecast(days: usize) -> Vec<DailyTemperature> {
        vec![
            DailyTemperature {
                min_c: 20.0,
                max_c: 32.0
            };
            days
        ]
    }

    #[tokio::test]
    async fn test_full_pipeline_with_observed_lags() {
        let config = test_config();
        let mut prices = HashMap::new();
        prices.insert(date(2024, 9, 10), 2850.0);
        prices.insert(date(2024, 9, 6), 2790.0);
        let history = FakeHistory {
            prices,
            queried: Mutex::new(Vec::new()),
        };
        let predictor = FixedPredictor(2893.456789);
        let service = PredictionService::new(&history, &predictor, &config);

        let result = service
            .predict_all(date(2024, 6, 1), &warm_forecast(8), "Karnataka", "Gulbarga")
            .await
            .unwrap();

        assert_eq!(result.sowing_date, date(2024, 6, 1));
        assert_eq!(result.harvest_date, date(2024, 9, 13));
        assert_eq!(result.lag_3_price, 2850.0);
        assert_eq!(result.lag_7_price, 2790.0);
        assert_eq!(result.predicted_price, 2893.46);
        assert_eq!(result.state, "Karnataka");
        assert_eq!(result.market, "Gulbarga");
    }

    #[tokio::test]
    async fn test_history_queried_at_harvest_minus_3_and_7() {
        let config = test_config();
        let history = FakeHistory {
            prices: HashMap::new(),
            queried: Mutex::new(Vec::new()),
        };
        let predictor = FixedPredictor(2900.0);
        let service = PredictionService::new(&history, &predictor, &config);

        let result = service
            .predict_all(date(2024, 6, 1), &[], "Karnataka", "Gulbarga")
            .await
            .unwrap();

        let queried = history.queried.lock().unwrap();
        assert_eq!(
            queried.as_slice(),
            &[
                result.harvest_date - chrono::Duration::days(3),
                result.harvest_date - chrono::Duration::days(7),
            ]
        );
    }

    #[tokio::test]
    async fn test_estimated_lags_are_populated_in_the_result() {
        let config = test_config();
        let history = FakeHistory {
            prices: HashMap::new(),
            queried: Mutex::new(Vec::new()),
        };
        let predictor = FixedPredictor(2871.239);
        let service = PredictionService::new(&history, &predictor, &config);

        let result = service
            .predict_all(date(2024, 6, 1), &warm_forecast(8), "Karnataka", "Gulbarga")
            .await
            .unwrap();

        assert_eq!(result.lag_3_price, 2871.24);
        assert_eq!(result.lag_7_price, 2871.24);
        assert_eq!(result.predicted_price, 2871.24);
    }

    #[tokio::test]
    async fn test_non_finite_lag_short_circuits_with_logical_error() {
        let config = test_config();
        let history = FakeHistory {
            prices: HashMap::new(),
            queried: Mutex::new(Vec::new()),
        };
        let predictor = FixedPredictor(f64::NAN);
        let service = PredictionService::new(&history, &predictor, &config);

        let result = service
            .predict_all(date(2024, 6, 1), &warm_forecast(8), "Karnataka", "Gulbarga")
            .await;

        assert!(matches!(
            result,
            Err(AppError::LagPriceResolution { .. })
        ));
    }

    #[test]
    fn test_rounding_to_two_decimals() {
        assert_eq!(round_to_paise(2893.456789), 2893.46);
        assert_eq!(round_to_paise(2893.454), 2893.45);
        assert_eq!(round_to_paise(2900.0), 2900.0);
    }

    #[test]
    fn test_result_serializes_dates_as_iso() {
        let result = PredictionResult {
            sowing_date: date(2024, 6, 1),
            harvest_date: date(2024, 9, 13),
            lag_3_price: 2850.0,
            lag_7_price: 2790.0,
            predicted_price: 2893.46,
            state: "Karnataka".to_string(),
            market: "Gulbarga".to_string(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["sowing_date"], "2024-06-01");
        assert_eq!(json["harvest_date"], "2024-09-13");
    }
}
