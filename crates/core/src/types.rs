use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Currency code (ISO 4217, e.g. `NGN`) to units-per-USD exchange rate.
pub type RateTable = HashMap<String, f64>;

/// The two external datasets a refresh is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataProvider {
    ExchangeRates,
    CountryDirectory,
}

impl DataProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExchangeRates => "exchange_rates",
            Self::CountryDirectory => "country_directory",
        }
    }

    /// Host name reported to callers when the provider is unreachable.
    pub fn host(&self) -> &'static str {
        match self {
            Self::ExchangeRates => "open.er-api.com",
            Self::CountryDirectory => "restcountries.com",
        }
    }
}

impl fmt::Display for DataProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
