//! Storage seam for country records.
//!
//! Handlers and the refresh engine hold an `Arc<dyn CountryStore>` so the
//! same code runs against PostgreSQL in production and against
//! [`MemoryCountryStore`] in tests and database-less development.

mod memory;
mod postgres;

pub use memory::MemoryCountryStore;
pub use postgres::PgCountryStore;

use async_trait::async_trait;
use atlas_core::query::CountryFilter;
use atlas_core::types::Timestamp;

use crate::models::country::{Country, UpsertPlan};

/// Operations the refresh pipeline and the query endpoints need.
///
/// Name arguments are always matched case-insensitively.
#[async_trait]
pub trait CountryStore: Send + Sync {
    /// Existing rows whose name matches any of `names`.
    async fn find_by_names(&self, names: &[String]) -> Result<Vec<Country>, sqlx::Error>;

    /// Apply creates and overwrites; returns the stored rows in any order.
    async fn apply_upserts(&self, plan: &UpsertPlan) -> Result<Vec<Country>, sqlx::Error>;

    async fn list(&self, filter: &CountryFilter) -> Result<Vec<Country>, sqlx::Error>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Country>, sqlx::Error>;

    /// Returns `true` if a row was removed.
    async fn delete_by_name(&self, name: &str) -> Result<bool, sqlx::Error>;

    async fn count(&self) -> Result<i64, sqlx::Error>;

    /// Latest `last_refreshed_at` across all rows.
    async fn latest_refresh(&self) -> Result<Option<Timestamp>, sqlx::Error>;

    async fn health_check(&self) -> Result<(), sqlx::Error>;
}
