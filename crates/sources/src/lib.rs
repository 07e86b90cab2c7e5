//! Gateways to the two external datasets a refresh is built from.
//!
//! - [`ExchangeRateClient`]: USD-based exchange rates keyed by currency code.
//! - [`CountryDirectoryClient`]: the full list of countries.
//!
//! Both fail as a unit: any transport error, timeout, non-2xx status or
//! unexpected payload is returned as a [`SourceError`] and no partial data
//! is ever handed back. There are no retries.

pub mod config;
pub mod countries;
pub mod exchange_rates;
mod http;

use async_trait::async_trait;
use atlas_core::types::RateTable;

pub use config::SourcesConfig;
pub use countries::{CountryDirectoryClient, CurrencyDescriptor, RawCountry};
pub use exchange_rates::ExchangeRateClient;

/// Errors from either gateway.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The provider answered but reported failure in its payload.
    #[error("Provider reported failure: {0}")]
    Rejected(String),

    /// The body could not be decoded into the expected shape.
    #[error("Unexpected payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Source of the currency-code to USD rate table.
#[async_trait]
pub trait ExchangeRateGateway: Send + Sync {
    async fn fetch_rates(&self) -> Result<RateTable, SourceError>;
}

/// Source of the full country list.
#[async_trait]
pub trait CountryDirectoryGateway: Send + Sync {
    async fn fetch_countries(&self) -> Result<Vec<RawCountry>, SourceError>;
}
