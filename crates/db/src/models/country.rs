//! Country entity model and write DTOs.

use atlas_core::summary::GdpEntry;
use atlas_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `countries` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Country {
    pub id: DbId,
    /// Unique under case-insensitive comparison.
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: i64,
    pub currency_code: Option<String>,
    pub exchange_rate: Option<f64>,
    pub estimated_gdp: Option<f64>,
    pub flag_url: Option<String>,
    pub last_refreshed_at: Timestamp,
}

impl Country {
    pub fn gdp_entry(&self) -> GdpEntry<'_> {
        GdpEntry {
            name: &self.name,
            estimated_gdp: self.estimated_gdp,
        }
    }
}

/// Every column a refresh writes for one country.
///
/// Updates overwrite all of these; nothing is merged with the old row.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryWrite {
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: i64,
    pub currency_code: Option<String>,
    pub exchange_rate: Option<f64>,
    pub estimated_gdp: Option<f64>,
    pub flag_url: Option<String>,
    pub last_refreshed_at: Timestamp,
}

/// A refresh batch split into new rows and in-place overwrites.
#[derive(Debug, Clone, Default)]
pub struct UpsertPlan {
    pub creates: Vec<CountryWrite>,
    /// Existing row id paired with its replacement values.
    pub updates: Vec<(DbId, CountryWrite)>,
}

impl UpsertPlan {
    pub fn len(&self) -> usize {
        self.creates.len() + self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creates.is_empty() && self.updates.is_empty()
    }
}

/// Aggregate view returned by the status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryStatus {
    pub total_countries: i64,
    /// Latest `last_refreshed_at` across all rows; `None` for an empty table.
    pub last_refreshed_at: Option<Timestamp>,
}
