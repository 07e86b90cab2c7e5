use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use atlas_core::error::CoreError;
use atlas_core::gdp::GdpMultiplier;
use atlas_core::summary::{GdpEntry, SummaryImage};
use atlas_core::types::{DataProvider, Timestamp};
use atlas_db::models::country::Country;
use atlas_db::store::CountryStore;
use atlas_sources::{CountryDirectoryGateway, ExchangeRateGateway};
use chrono::{DurationRound, TimeDelta, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::error::RefreshError;
use crate::reconcile::{build_writes, in_source_order, plan_upserts};

/// Result of a completed refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshOutcome {
    /// Number of records the country directory returned.
    pub total: usize,
    pub refreshed_at: Timestamp,
    /// Non-fatal problems, e.g. the summary image could not be replaced.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Runs refreshes against one store, one at a time.
pub struct RefreshService {
    rates: Arc<dyn ExchangeRateGateway>,
    directory: Arc<dyn CountryDirectoryGateway>,
    store: Arc<dyn CountryStore>,
    summary: SummaryImage,
    multiplier: GdpMultiplier,
    /// Held for the whole refresh; a second caller waits its turn.
    gate: Mutex<()>,
    last_success: RwLock<Option<Timestamp>>,
}

impl RefreshService {
    pub fn new(
        rates: Arc<dyn ExchangeRateGateway>,
        directory: Arc<dyn CountryDirectoryGateway>,
        store: Arc<dyn CountryStore>,
        summary: SummaryImage,
    ) -> Self {
        Self {
            rates,
            directory,
            store,
            summary,
            multiplier: GdpMultiplier::from_entropy(),
            gate: Mutex::new(()),
            last_success: RwLock::new(None),
        }
    }

    /// Replace the multiplier source, e.g. with a seeded one.
    pub fn with_multiplier(mut self, multiplier: GdpMultiplier) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn summary(&self) -> &SummaryImage {
        &self.summary
    }

    /// Instant of the last refresh that completed in this process.
    pub fn last_success(&self) -> Option<Timestamp> {
        *self
            .last_success
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch, derive, merge and redraw.
    ///
    /// Both providers must answer before anything is written. A failed image
    /// write does not fail the refresh; it is logged and returned in
    /// [`RefreshOutcome::warnings`].
    pub async fn refresh(&self) -> Result<RefreshOutcome, RefreshError> {
        let _turn = self.gate.lock().await;
        let started = Instant::now();

        let (rates, countries) = tokio::try_join!(
            async {
                self.rates.fetch_rates().await.map_err(|source| {
                    RefreshError::ExternalUnavailable {
                        provider: DataProvider::ExchangeRates,
                        source,
                    }
                })
            },
            async {
                self.directory.fetch_countries().await.map_err(|source| {
                    RefreshError::ExternalUnavailable {
                        provider: DataProvider::CountryDirectory,
                        source,
                    }
                })
            },
        )
        .inspect_err(|e| tracing::warn!(error = ?e, "Refresh aborted before any store write"))?;

        // Postgres keeps microseconds; truncating keeps the returned instant
        // equal to what is stored.
        let now = Utc::now();
        let now = now.duration_trunc(TimeDelta::microseconds(1)).unwrap_or(now);

        let total = countries.len();
        let writes = build_writes(&countries, &rates, &self.multiplier, now);
        let names: Vec<String> = writes.iter().map(|w| w.name.clone()).collect();

        let existing = self
            .store
            .find_by_names(&names)
            .await
            .map_err(|source| RefreshError::Store {
                stage: "load_existing",
                count: names.len(),
                source,
            })?;

        let plan = plan_upserts(writes, &existing);
        let (created, updated) = (plan.creates.len(), plan.updates.len());

        let rows = self
            .store
            .apply_upserts(&plan)
            .await
            .map_err(|source| RefreshError::Store {
                stage: "apply_upserts",
                count: plan.len(),
                source,
            })?;
        let rows = in_source_order(&names, rows);

        *self
            .last_success
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(now);

        let mut warnings = Vec::new();
        if let Err(e) = self.render_summary(total, now, rows).await {
            tracing::warn!(
                error = %e,
                path = %self.summary.path().display(),
                "Summary image not updated"
            );
            warnings.push(e.to_string());
        }

        tracing::info!(
            total,
            created,
            updated,
            rates = rates.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Country refresh complete"
        );

        Ok(RefreshOutcome {
            total,
            refreshed_at: now,
            warnings,
        })
    }

    async fn render_summary(
        &self,
        total: usize,
        refreshed_at: Timestamp,
        rows: Vec<Country>,
    ) -> Result<(), CoreError> {
        let summary = self.summary.clone();
        tokio::task::spawn_blocking(move || {
            let entries: Vec<GdpEntry<'_>> = rows.iter().map(Country::gdp_entry).collect();
            summary.render(total, refreshed_at, &entries)
        })
        .await
        .map_err(|e| CoreError::Internal(format!("Summary render task failed: {e}")))?
    }
}
