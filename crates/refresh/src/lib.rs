//! The refresh pipeline.
//!
//! [`RefreshService::refresh`] fetches both external datasets, derives each
//! country's exchange rate and estimated GDP, merges the result into the
//! [`CountryStore`](atlas_db::store::CountryStore) by case-insensitive name
//! and redraws the summary image.

mod error;
pub mod reconcile;
mod service;

pub use error::RefreshError;
pub use service::{RefreshOutcome, RefreshService};
