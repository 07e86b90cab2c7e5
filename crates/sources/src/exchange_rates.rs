//! Client for the USD-based exchange-rate endpoint.
//!
//! Expected payload:
//!
//! ```json
//! { "result": "success", "base_code": "USD", "rates": { "NGN": 1600.5, "GHS": 15.2 } }
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use atlas_core::types::RateTable;
use serde::Deserialize;

use crate::http::get_json;
use crate::{ExchangeRateGateway, SourceError};

/// The only `result` value that carries a usable rate table.
const SUCCESS: &str = "success";

#[derive(Debug, Deserialize)]
struct RatesPayload {
    result: String,
    #[serde(default)]
    rates: Option<HashMap<String, f64>>,
}

impl RatesPayload {
    fn into_table(self) -> Result<RateTable, SourceError> {
        if self.result != SUCCESS {
            return Err(SourceError::Rejected(format!("result was '{}'", self.result)));
        }
        self.rates
            .ok_or_else(|| SourceError::Rejected("success response without rates".to_string()))
    }
}

/// HTTP client for the exchange-rate provider.
pub struct ExchangeRateClient {
    client: reqwest::Client,
    url: String,
}

impl ExchangeRateClient {
    /// Create a client reusing an existing [`reqwest::Client`] (and its timeout).
    pub fn with_client(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl ExchangeRateGateway for ExchangeRateClient {
    async fn fetch_rates(&self) -> Result<RateTable, SourceError> {
        let payload: RatesPayload = get_json(&self.client, &self.url).await?;
        let rates = payload.into_table()?;
        tracing::debug!(count = rates.len(), "Fetched exchange rates");
        Ok(rates)
    }
}
