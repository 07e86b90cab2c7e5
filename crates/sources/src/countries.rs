//! Client for the country-directory endpoint.
//!
//! Expected payload: a JSON array of
//!
//! ```json
//! { "name": "Nigeria", "capital": "Abuja", "region": "Africa",
//!   "population": 206139589, "flag": "https://...",
//!   "currencies": [{ "code": "NGN", "name": "Nigerian naira", "symbol": "₦" }] }
//! ```

use async_trait::async_trait;
use serde::Deserialize;

use crate::http::get_json;
use crate::{CountryDirectoryGateway, SourceError};

/// One country as reported by the directory provider.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawCountry {
    pub name: String,
    #[serde(default)]
    pub capital: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    pub population: u64,
    #[serde(default)]
    pub flag: Option<String>,
    #[serde(default)]
    pub currencies: Option<Vec<CurrencyDescriptor>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrencyDescriptor {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
}

impl RawCountry {
    /// Code of the first listed currency, if it has a non-empty one.
    pub fn primary_currency_code(&self) -> Option<&str> {
        self.currencies
            .as_deref()?
            .first()?
            .code
            .as_deref()
            .filter(|code| !code.is_empty())
    }
}

/// HTTP client for the country-directory provider.
pub struct CountryDirectoryClient {
    client: reqwest::Client,
    url: String,
}

impl CountryDirectoryClient {
    /// Create a client reusing an existing [`reqwest::Client`] (and its timeout).
    pub fn with_client(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl CountryDirectoryGateway for CountryDirectoryClient {
    async fn fetch_countries(&self) -> Result<Vec<RawCountry>, SourceError> {
        let countries: Vec<RawCountry> = get_json(&self.client, &self.url).await?;
        tracing::debug!(count = countries.len(), "Fetched country directory");
        Ok(countries)
    }
}
