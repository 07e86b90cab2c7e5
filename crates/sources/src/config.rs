use std::time::Duration;

use crate::SourceError;

pub const DEFAULT_EXCHANGE_RATES_URL: &str = "https://open.er-api.com/v6/latest/USD";
pub const DEFAULT_COUNTRIES_URL: &str =
    "https://restcountries.com/v2/all?fields=name,capital,region,population,flag,currencies";

/// Endpoints and timeout for the external providers.
#[derive(Debug, Clone)]
pub struct SourcesConfig {
    pub exchange_rates_url: String,
    pub countries_url: String,
    /// Upper bound on each provider call, connect to last byte.
    pub timeout_secs: u64,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            exchange_rates_url: DEFAULT_EXCHANGE_RATES_URL.to_string(),
            countries_url: DEFAULT_COUNTRIES_URL.to_string(),
            timeout_secs: 15,
        }
    }
}

impl SourcesConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var               | Default                                  |
    /// |-----------------------|------------------------------------------|
    /// | `EXCHANGE_RATES_URL`  | `https://open.er-api.com/v6/latest/USD`  |
    /// | `COUNTRIES_URL`       | restcountries v2 `all` with field filter |
    /// | `SOURCE_TIMEOUT_SECS` | `15`                                     |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let exchange_rates_url =
            std::env::var("EXCHANGE_RATES_URL").unwrap_or(defaults.exchange_rates_url);

        let countries_url = std::env::var("COUNTRIES_URL").unwrap_or(defaults.countries_url);

        let timeout_secs: u64 = std::env::var("SOURCE_TIMEOUT_SECS")
            .unwrap_or_else(|_| defaults.timeout_secs.to_string())
            .parse()
            .expect("SOURCE_TIMEOUT_SECS must be a valid u64");

        Self {
            exchange_rates_url,
            countries_url,
            timeout_secs,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build the HTTP client shared by both gateways.
    pub fn build_client(&self) -> Result<reqwest::Client, SourceError> {
        Ok(reqwest::Client::builder().timeout(self.timeout()).build()?)
    }

    pub fn exchange_rate_client(&self, client: reqwest::Client) -> crate::ExchangeRateClient {
        crate::ExchangeRateClient::with_client(client, self.exchange_rates_url.clone())
    }

    pub fn country_directory_client(&self, client: reqwest::Client) -> crate::CountryDirectoryClient {
        crate::CountryDirectoryClient::with_client(client, self.countries_url.clone())
    }
}
