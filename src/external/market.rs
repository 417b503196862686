//! Historical mandi price client for the AGMARKNET dataset on data.gov.in
//!
//! Looks up the modal price for a (state, market, commodity, date) tuple with
//! exact-date match semantics; the source performs no date-range fallback.

use std::future::Future;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{AppError, AppResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const RECORD_LIMIT: &str = "1000";

/// Capability interface over the historical price source.
///
/// `Ok(None)` means the source answered but holds no usable record for the
/// date; `Err` is a transport-level failure. The caller decides whether to
/// swallow transport failures.
pub trait PriceHistory {
    fn modal_price(
        &self,
        state: &str,
        market: &str,
        commodity: &str,
        date: NaiveDate,
    ) -> impl Future<Output = AppResult<Option<f64>>> + Send;
}

/// AGMARKNET price API client
#[derive(Clone)]
pub struct MarketClient {
    client: Client,
    api_key: String,
    resource_id: String,
    base_url: String,
}

/// data.gov.in resource API response
#[derive(Debug, Deserialize)]
struct MandiPriceResponse {
    #[serde(default)]
    records: Vec<MandiRecord>,
}

#[derive(Debug, Deserialize)]
struct MandiRecord {
    // Arrives as a string in practice, but the dataset is not consistent
    #[serde(default)]
    modal_price: Option<serde_json::Value>,
}

impl MarketClient {
    /// Create a new MarketClient for the given endpoint and dataset resource
    pub fn new(api_key: String, resource_id: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            resource_id,
            base_url,
        }
    }
}

impl PriceHistory for MarketClient {
    async fn modal_price(
        &self,
        state: &str,
        market: &str,
        commodity: &str,
        date: NaiveDate,
    ) -> AppResult<Option<f64>> {
        let url = format!("{}/{}", self.base_url, self.resource_id);
        let date_filter = date.to_string();

        let response = self
            .client
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .query(&[
                ("api-key", self.api_key.as_str()),
                ("format", "json"),
                ("limit", RECORD_LIMIT),
                ("filters[state]", state),
                ("filters[market]", market),
                ("filters[commodity]", commodity),
                ("filters[date]", date_filter.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::MarketService(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::MarketService(format!(
                "unexpected status {}",
                response.status()
            )));
        }

        let data: MandiPriceResponse = response
            .json()
            .await
            .map_err(|e| AppError::MarketService(format!("failed to parse response: {}", e)))?;

        Ok(extract_modal_price(&data))
    }
}

/// Pull a numeric modal price out of the first matching record, if any
fn extract_modal_price(response: &MandiPriceResponse) -> Option<f64> {
    let value = response.records.first()?.modal_price.as_ref()?;
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
