use std::cmp::Ordering;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use atlas_core::query::{name_key, CountryFilter, CountrySort};
use atlas_core::types::{DbId, Timestamp};

use super::CountryStore;
use crate::models::country::{Country, CountryWrite, UpsertPlan};

/// Process-local [`CountryStore`] with the same matching and ordering rules
/// as the PostgreSQL implementation.
///
/// Rows are kept in id order; ids are never reused.
#[derive(Default)]
pub struct MemoryCountryStore {
    state: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    rows: Vec<Country>,
    next_id: DbId,
}

impl MemoryState {
    fn position_by_name(&self, name: &str) -> Option<usize> {
        let key = name_key(name);
        self.rows.iter().position(|c| name_key(&c.name) == key)
    }

    fn insert(&mut self, write: &CountryWrite) -> Country {
        self.next_id += 1;
        let row = overwrite(self.next_id, write);
        self.rows.push(row.clone());
        row
    }

    /// Overwrite the row with the same name, or insert a new one.
    fn upsert_by_name(&mut self, write: &CountryWrite) -> Country {
        match self.position_by_name(&write.name) {
            Some(idx) => {
                let id = self.rows[idx].id;
                self.rows[idx] = overwrite(id, write);
                self.rows[idx].clone()
            }
            None => self.insert(write),
        }
    }
}

impl MemoryCountryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed rows directly, bypassing the refresh pipeline.
    pub fn with_rows(writes: impl IntoIterator<Item = CountryWrite>) -> Self {
        let store = Self::default();
        {
            let mut state = store.lock();
            for write in writes {
                state.insert(&write);
            }
        }
        store
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn overwrite(id: DbId, w: &CountryWrite) -> Country {
    Country {
        id,
        name: w.name.clone(),
        capital: w.capital.clone(),
        region: w.region.clone(),
        population: w.population,
        currency_code: w.currency_code.clone(),
        exchange_rate: w.exchange_rate,
        estimated_gdp: w.estimated_gdp,
        flag_url: w.flag_url.clone(),
        last_refreshed_at: w.last_refreshed_at,
    }
}

/// `estimated_gdp DESC NULLS LAST`; equal keys keep id order under a stable sort.
fn gdp_desc_nulls_last(a: &Country, b: &Country) -> Ordering {
    match (a.estimated_gdp, b.estimated_gdp) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait]
impl CountryStore for MemoryCountryStore {
    async fn find_by_names(&self, names: &[String]) -> Result<Vec<Country>, sqlx::Error> {
        let keys: Vec<String> = names.iter().map(|n| name_key(n)).collect();
        Ok(self
            .lock()
            .rows
            .iter()
            .filter(|c| keys.contains(&name_key(&c.name)))
            .cloned()
            .collect())
    }

    async fn apply_upserts(&self, plan: &UpsertPlan) -> Result<Vec<Country>, sqlx::Error> {
        let mut state = self.lock();
        let mut results = Vec::with_capacity(plan.len());

        // An update whose row was deleted since the plan was built becomes a create.
        for (id, write) in &plan.updates {
            match state.rows.iter().position(|c| c.id == *id) {
                Some(idx) => {
                    state.rows[idx] = overwrite(*id, write);
                    results.push(state.rows[idx].clone());
                }
                None => results.push(state.upsert_by_name(write)),
            }
        }

        for write in &plan.creates {
            results.push(state.upsert_by_name(write));
        }

        Ok(results)
    }

    async fn list(&self, filter: &CountryFilter) -> Result<Vec<Country>, sqlx::Error> {
        let mut rows: Vec<Country> = self
            .lock()
            .rows
            .iter()
            .filter(|c| {
                filter
                    .region
                    .as_ref()
                    .is_none_or(|r| c.region.as_ref() == Some(r))
            })
            .filter(|c| {
                filter
                    .currency
                    .as_ref()
                    .is_none_or(|code| c.currency_code.as_ref() == Some(code))
            })
            .cloned()
            .collect();

        if let Some(CountrySort::GdpDesc) = filter.sort {
            rows.sort_by(gdp_desc_nulls_last);
        }
        Ok(rows)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Country>, sqlx::Error> {
        let state = self.lock();
        Ok(state.position_by_name(name).map(|idx| state.rows[idx].clone()))
    }

    async fn delete_by_name(&self, name: &str) -> Result<bool, sqlx::Error> {
        let mut state = self.lock();
        match state.position_by_name(name) {
            Some(idx) => {
                state.rows.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count(&self) -> Result<i64, sqlx::Error> {
        Ok(self.lock().rows.len() as i64)
    }

    async fn latest_refresh(&self) -> Result<Option<Timestamp>, sqlx::Error> {
        Ok(self.lock().rows.iter().map(|c| c.last_refreshed_at).max())
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }
}
