//! Lag price resolution for the price regression feature vector
//!
//! Resolves the historical reference prices 3 and 7 days before harvest.
//! Each lag is looked up independently in the price history source; when a
//! lag is unavailable (no record, non-numeric price, or a transport failure)
//! the regression model itself estimates it from the lag date's calendar
//! fields and a placeholder lag value. Transport failures never propagate
//! past this component.

use chrono::{Duration, NaiveDate};

use crate::error::AppResult;
use crate::external::market::PriceHistory;
use crate::model::{PriceFeatures, PricePredictor};

/// Where a lag price came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceOrigin {
    /// Looked up in the price history source
    Observed,
    /// Estimated by the regression model fallback
    Estimated,
}

/// A resolved lag price with its provenance
#[derive(Debug, Clone, Copy)]
pub struct LagPrice {
    pub value: f64,
    pub origin: PriceOrigin,
}

/// Resolves lag-3 and lag-7 reference prices for a harvest date
pub struct LagPriceResolver<'a, H, P> {
    history: &'a H,
    predictor: &'a P,
    commodity: &'a str,
    placeholder_lag_price: f64,
}

impl<'a, H: PriceHistory, P: PricePredictor> LagPriceResolver<'a, H, P> {
    pub fn new(
        history: &'a H,
        predictor: &'a P,
        commodity: &'a str,
        placeholder_lag_price: f64,
    ) -> Self {
        Self {
            history,
            predictor,
            commodity,
            placeholder_lag_price,
        }
    }

    /// Resolve both lag prices for a harvest date; each lag is independent
    pub async fn resolve(
        &self,
        state: &str,
        market: &str,
        harvest_date: NaiveDate,
    ) -> AppResult<(LagPrice, LagPrice)> {
        let lag_3 = self
            .resolve_one(state, market, harvest_date - Duration::days(3))
            .await?;
        let lag_7 = self
            .resolve_one(state, market, harvest_date - Duration::days(7))
            .await?;
        Ok((lag_3, lag_7))
    }

    async fn resolve_one(&self, state: &str, market: &str, date: NaiveDate) -> AppResult<LagPrice> {
        let observed = match self
            .history
            .modal_price(state, market, self.commodity, date)
            .await
        {
            Ok(price) => price,
            Err(err) => {
                tracing::warn!(
                    %date,
                    state,
                    market,
                    error = %err,
                    "price history lookup failed, falling back to model estimate"
                );
                None
            }
        };

        if let Some(value) = observed {
            return Ok(LagPrice {
                value,
                origin: PriceOrigin::Observed,
            });
        }

        // Degraded mode: the placeholder stands in for both lag inputs.
        // A predictor failure here is fatal to the request.
        let features =
            PriceFeatures::for_date(date, self.placeholder_lag_price, self.placeholder_lag_price);
        let value = self.predictor.predict(&features)?;

        Ok(LagPrice {
            value,
            origin: PriceOrigin::Estimated,
        })
    }
}
