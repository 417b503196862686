//! Harvest date estimation by growing-degree-day (GDD) accumulation
//!
//! Walks forward from the sowing date, accumulating daily heat units above
//! the crop base temperature until the maturity threshold is reached. Days
//! beyond the forecast horizon use a fixed fallback record, so the walk
//! always terminates even with an empty forecast.

use chrono::{Duration, NaiveDate};

use crate::config::CropConfig;
use crate::external::weather::DailyTemperature;

/// Crop maturity parameters for the GDD walk
#[derive(Debug, Clone)]
pub struct GddParams {
    pub base_temp_c: f64,
    pub maturity_threshold_gdd: f64,
    pub fallback: DailyTemperature,
}

impl From<&CropConfig> for GddParams {
    fn from(cfg: &CropConfig) -> Self {
        Self {
            base_temp_c: cfg.base_temp_c,
            maturity_threshold_gdd: cfg.maturity_threshold_gdd,
            fallback: DailyTemperature {
                min_c: cfg.fallback_tmin_c,
                max_c: cfg.fallback_tmax_c,
            },
        }
    }
}

/// Daily GDD contribution: mean temperature above the crop base, floored at zero
pub fn daily_gdd(day: DailyTemperature, base_temp_c: f64) -> f64 {
    let mean = (day.min_c + day.max_c) / 2.0;
    (mean - base_temp_c).max(0.0)
}

/// Predict the harvest date for a sowing date against a daily forecast.
///
/// Returns the first date at which the accumulated GDD reaches the maturity
/// threshold, i.e. the day after the contribution that crossed it. The
/// forecast is indexed by day-offset from the present day while the cursor
/// walks from the sowing date; the fallback record absorbs both a short
/// horizon and any offset between the two.
pub fn predict_harvest_date(
    sowing_date: NaiveDate,
    forecast: &[DailyTemperature],
    params: &GddParams,
) -> NaiveDate {
    let mut accumulated = 0.0;
    let mut current = sowing_date;
    let mut day = 0usize;

    while accumulated < params.maturity_threshold_gdd {
        let record = forecast.get(day).copied().unwrap_or(params.fallback);
        accumulated += daily_gdd(record, params.base_temp_c);
        current = current + Duration::days(1);
        day += 1;
    }

    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn params() -> GddParams {
        GddParams {
            base_temp_c: 10.0,
            maturity_threshold_gdd: 1650.0,
            fallback: DailyTemperature {
                min_c: 20.0,
                max_c: 32.0,
            },
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_daily_gdd_above_base() {
        let day = DailyTemperature {
            min_c: 20.0,
            max_c: 32.0,
        };
        assert_eq!(daily_gdd(day, 10.0), 16.0);
    }

    #[test]
    fn test_daily_gdd_floored_at_zero() {
        let cold = DailyTemperature {
            min_c: -5.0,
            max_c: 5.0,
        };
        assert_eq!(daily_gdd(cold, 10.0), 0.0);
    }

    #[test]
    fn test_long_warm_forecast_matures_in_104_days() {
        // 16 GDD/day: 103 days accumulate 1648, the 104th crosses 1650
        let forecast = vec![
            DailyTemperature {
                min_c: 20.0,
                max_c: 32.0
            };
            200
        ];
        let harvest = predict_harvest_date(date(2024, 6, 1), &forecast, &params());
        assert_eq!(harvest, date(2024, 9, 13));
        assert_eq!((harvest - date(2024, 6, 1)).num_days(), 104);
    }

    #[test]
    fn test_empty_forecast_matches_identical_fallback_values() {
        let forecast = vec![
            DailyTemperature {
                min_c: 20.0,
                max_c: 32.0
            };
            200
        ];
        let from_forecast = predict_harvest_date(date(2024, 6, 1), &forecast, &params());
        let from_fallback = predict_harvest_date(date(2024, 6, 1), &[], &params());
        assert_eq!(from_fallback, from_forecast);
        assert_eq!(from_fallback, date(2024, 9, 13));
    }

    #[test]
    fn test_cold_forecast_still_terminates_after_sowing() {
        // Horizon days contribute nothing; the fallback takes over afterwards
        let forecast = vec![
            DailyTemperature {
                min_c: 0.0,
                max_c: 0.0
            };
            5
        ];
        let sowing = date(2024, 11, 15);
        let harvest = predict_harvest_date(sowing, &forecast, &params());
        assert!(harvest > sowing);
        assert_eq!((harvest - sowing).num_days(), 5 + 104);
    }

    #[test]
    fn test_idempotent_for_identical_inputs() {
        let forecast = vec![
            DailyTemperature {
                min_c: 18.5,
                max_c: 31.2
            };
            8
        ];
        let first = predict_harvest_date(date(2024, 6, 1), &forecast, &params());
        let second = predict_harvest_date(date(2024, 6, 1), &forecast, &params());
        assert_eq!(first, second);
    }

    fn forecast_strategy(
        max_len: usize,
    ) -> impl Strategy<Value = Vec<DailyTemperature>> {
        proptest::collection::vec((0.0..40.0f64, 0.0..10.0f64), 0..max_len).prop_map(|days| {
            days.into_iter()
                .map(|(min, spread)| DailyTemperature {
                    min_c: min,
                    max_c: min + spread,
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_warmer_forecast_never_delays_harvest(
            forecast in forecast_strategy(20),
            bump in 0.0..10.0f64,
        ) {
            let warmer: Vec<DailyTemperature> = forecast
                .iter()
                .map(|d| DailyTemperature { min_c: d.min_c + bump, max_c: d.max_c + bump })
                .collect();

            let sowing = date(2024, 6, 1);
            let p = params();
            prop_assert!(
                predict_harvest_date(sowing, &warmer, &p)
                    <= predict_harvest_date(sowing, &forecast, &p)
            );
        }

        #[test]
        fn prop_terminates_within_fallback_bound(forecast in forecast_strategy(10)) {
            // Worst case: every horizon day contributes nothing, then the
            // fallback advances 16 GDD/day, crossing 1650 on day 104
            let sowing = date(2024, 6, 1);
            let harvest = predict_harvest_date(sowing, &forecast, &params());
            let elapsed = (harvest - sowing).num_days();
            prop_assert!(elapsed >= 1);
            prop_assert!(elapsed <= forecast.len() as i64 + 104);
        }
    }
}
