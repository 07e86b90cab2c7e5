//! Repository for the `countries` table.

use std::collections::HashSet;

use atlas_core::query::{CountryFilter, CountrySort};
use atlas_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::country::{Country, CountryWrite, UpsertPlan};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, capital, region, population, currency_code, exchange_rate, \
     estimated_gdp, flag_url, last_refreshed_at";

/// Same columns qualified with the `c` alias used by the batch update.
const COLUMNS_C: &str = "c.id, c.name, c.capital, c.region, c.population, c.currency_code, \
     c.exchange_rate, c.estimated_gdp, c.flag_url, c.last_refreshed_at";

/// Provides query and batch-upsert operations for countries.
///
/// Every name comparison goes through `LOWER(name)`, which is also the
/// expression behind the `uq_countries_name_lower` unique index.
pub struct CountryRepo;

impl CountryRepo {
    /// Find a country by case-insensitive name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Country>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM countries WHERE LOWER(name) = LOWER($1)");
        sqlx::query_as::<_, Country>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// All countries whose name matches any of `names`, case-insensitively.
    pub async fn find_by_names(pool: &PgPool, names: &[String]) -> Result<Vec<Country>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM countries \
             WHERE LOWER(name) IN (SELECT LOWER(n) FROM UNNEST($1::text[]) AS n) \
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Country>(&query)
            .bind(names)
            .fetch_all(pool)
            .await
    }

    /// List countries matching `filter`.
    ///
    /// Region and currency are exact, conjunctive matches. Without a sort the
    /// rows come back in id order.
    pub async fn list(pool: &PgPool, filter: &CountryFilter) -> Result<Vec<Country>, sqlx::Error> {
        let order = match filter.sort {
            Some(CountrySort::GdpDesc) => "estimated_gdp DESC NULLS LAST, id ASC",
            None => "id ASC",
        };
        let query = format!(
            "SELECT {COLUMNS} FROM countries \
             WHERE ($1::text IS NULL OR region = $1) \
               AND ($2::text IS NULL OR currency_code = $2) \
             ORDER BY {order}"
        );
        sqlx::query_as::<_, Country>(&query)
            .bind(&filter.region)
            .bind(&filter.currency)
            .fetch_all(pool)
            .await
    }

    /// Delete the country with the given case-insensitive name.
    /// Returns `true` if a row was removed.
    pub async fn delete_by_name(pool: &PgPool, name: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM countries WHERE LOWER(name) = LOWER($1)")
            .bind(name)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM countries")
            .fetch_one(pool)
            .await
    }

    /// Most recent `last_refreshed_at` across all rows.
    pub async fn latest_refresh(pool: &PgPool) -> Result<Option<Timestamp>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<Timestamp>>("SELECT MAX(last_refreshed_at) FROM countries")
            .fetch_one(pool)
            .await
    }

    /// Apply a refresh batch in one transaction: one bulk `UPDATE` for the
    /// overwrites and one bulk `INSERT` for the new rows.
    ///
    /// Inserts that collide with a row created since the plan was built fall
    /// through to an overwrite of that row. Updates whose row was deleted
    /// since then are inserted instead. Returned rows are in no particular
    /// order.
    pub async fn apply_upserts(pool: &PgPool, plan: &UpsertPlan) -> Result<Vec<Country>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut results = Vec::with_capacity(plan.len());
        let mut creates: Vec<&CountryWrite> = plan.creates.iter().collect();

        if !plan.updates.is_empty() {
            let ids: Vec<i64> = plan.updates.iter().map(|(id, _)| *id).collect();
            let cols: WriteColumns = plan.updates.iter().map(|(_, w)| w).collect();

            let query = format!(
                "UPDATE countries AS c SET \
                    name = u.name, \
                    capital = u.capital, \
                    region = u.region, \
                    population = u.population, \
                    currency_code = u.currency_code, \
                    exchange_rate = u.exchange_rate, \
                    estimated_gdp = u.estimated_gdp, \
                    flag_url = u.flag_url, \
                    last_refreshed_at = u.last_refreshed_at \
                 FROM UNNEST($1::bigint[], $2::text[], $3::text[], $4::text[], $5::bigint[], \
                             $6::text[], $7::float8[], $8::float8[], $9::text[], $10::timestamptz[]) \
                   AS u(id, name, capital, region, population, currency_code, exchange_rate, \
                        estimated_gdp, flag_url, last_refreshed_at) \
                 WHERE c.id = u.id \
                 RETURNING {COLUMNS_C}"
            );
            let rows = sqlx::query_as::<_, Country>(&query)
                .bind(&ids)
                .bind(&cols.names)
                .bind(&cols.capitals)
                .bind(&cols.regions)
                .bind(&cols.populations)
                .bind(&cols.currency_codes)
                .bind(&cols.exchange_rates)
                .bind(&cols.estimated_gdps)
                .bind(&cols.flag_urls)
                .bind(&cols.refreshed_at)
                .fetch_all(&mut *tx)
                .await?;

            let updated: HashSet<DbId> = rows.iter().map(|c| c.id).collect();
            creates.extend(
                plan.updates
                    .iter()
                    .filter(|(id, _)| !updated.contains(id))
                    .map(|(_, w)| w),
            );
            results.extend(rows);
        }

        if !creates.is_empty() {
            let cols: WriteColumns = creates.iter().copied().collect();

            let query = format!(
                "INSERT INTO countries \
                    (name, capital, region, population, currency_code, exchange_rate, \
                     estimated_gdp, flag_url, last_refreshed_at) \
                 SELECT * FROM UNNEST($1::text[], $2::text[], $3::text[], $4::bigint[], $5::text[], \
                                      $6::float8[], $7::float8[], $8::text[], $9::timestamptz[]) \
                 ON CONFLICT (LOWER(name)) DO UPDATE SET \
                    name = EXCLUDED.name, \
                    capital = EXCLUDED.capital, \
                    region = EXCLUDED.region, \
                    population = EXCLUDED.population, \
                    currency_code = EXCLUDED.currency_code, \
                    exchange_rate = EXCLUDED.exchange_rate, \
                    estimated_gdp = EXCLUDED.estimated_gdp, \
                    flag_url = EXCLUDED.flag_url, \
                    last_refreshed_at = EXCLUDED.last_refreshed_at \
                 RETURNING {COLUMNS}"
            );
            let rows = sqlx::query_as::<_, Country>(&query)
                .bind(&cols.names)
                .bind(&cols.capitals)
                .bind(&cols.regions)
                .bind(&cols.populations)
                .bind(&cols.currency_codes)
                .bind(&cols.exchange_rates)
                .bind(&cols.estimated_gdps)
                .bind(&cols.flag_urls)
                .bind(&cols.refreshed_at)
                .fetch_all(&mut *tx)
                .await?;
            results.extend(rows);
        }

        tx.commit().await?;
        tracing::debug!(
            created = plan.creates.len(),
            updated = plan.updates.len(),
            reinserted = creates.len() - plan.creates.len(),
            returned = results.len(),
            "Applied country upserts"
        );
        Ok(results)
    }
}

/// Column-major view of a set of writes, for binding to `UNNEST`.
#[derive(Default)]
struct WriteColumns {
    names: Vec<String>,
    capitals: Vec<Option<String>>,
    regions: Vec<Option<String>>,
    populations: Vec<i64>,
    currency_codes: Vec<Option<String>>,
    exchange_rates: Vec<Option<f64>>,
    estimated_gdps: Vec<Option<f64>>,
    flag_urls: Vec<Option<String>>,
    refreshed_at: Vec<Timestamp>,
}

impl<'a> FromIterator<&'a CountryWrite> for WriteColumns {
    fn from_iter<I: IntoIterator<Item = &'a CountryWrite>>(iter: I) -> Self {
        let mut cols = Self::default();
        for w in iter {
            cols.names.push(w.name.clone());
            cols.capitals.push(w.capital.clone());
            cols.regions.push(w.region.clone());
            cols.populations.push(w.population);
            cols.currency_codes.push(w.currency_code.clone());
            cols.exchange_rates.push(w.exchange_rate);
            cols.estimated_gdps.push(w.estimated_gdp);
            cols.flag_urls.push(w.flag_url.clone());
            cols.refreshed_at.push(w.last_refreshed_at);
        }
        cols
    }
}
