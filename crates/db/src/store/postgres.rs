use async_trait::async_trait;
use atlas_core::query::CountryFilter;
use atlas_core::types::Timestamp;

use super::CountryStore;
use crate::models::country::{Country, UpsertPlan};
use crate::repositories::CountryRepo;
use crate::DbPool;

/// [`CountryStore`] backed by the `countries` table.
#[derive(Clone)]
pub struct PgCountryStore {
    pool: DbPool,
}

impl PgCountryStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CountryStore for PgCountryStore {
    async fn find_by_names(&self, names: &[String]) -> Result<Vec<Country>, sqlx::Error> {
        CountryRepo::find_by_names(&self.pool, names).await
    }

    async fn apply_upserts(&self, plan: &UpsertPlan) -> Result<Vec<Country>, sqlx::Error> {
        CountryRepo::apply_upserts(&self.pool, plan).await
    }

    async fn list(&self, filter: &CountryFilter) -> Result<Vec<Country>, sqlx::Error> {
        CountryRepo::list(&self.pool, filter).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Country>, sqlx::Error> {
        CountryRepo::find_by_name(&self.pool, name).await
    }

    async fn delete_by_name(&self, name: &str) -> Result<bool, sqlx::Error> {
        CountryRepo::delete_by_name(&self.pool, name).await
    }

    async fn count(&self) -> Result<i64, sqlx::Error> {
        CountryRepo::count(&self.pool).await
    }

    async fn latest_refresh(&self) -> Result<Option<Timestamp>, sqlx::Error> {
        CountryRepo::latest_refresh(&self.pool).await
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        crate::health_check(&self.pool).await
    }
}
