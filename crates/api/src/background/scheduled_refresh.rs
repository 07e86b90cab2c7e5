//! Periodic country refresh.
//!
//! Runs [`RefreshService::refresh`] on a fixed interval. The first tick fires
//! immediately, so a fresh deployment is populated without a manual call. A
//! tick is skipped when a refresh (manual or scheduled) completed within the
//! last half interval.

use std::sync::Arc;
use std::time::Duration;

use atlas_core::types::Timestamp;
use atlas_refresh::RefreshService;
use chrono::Utc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Run the refresh loop until `cancel` is triggered.
pub async fn run(refresh: Arc<RefreshService>, period: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = period.as_secs(), "Scheduled refresh started");

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Scheduled refresh stopping");
                break;
            }
            _ = interval.tick() => {
                if refreshed_recently(refresh.last_success(), Utc::now(), period) {
                    tracing::debug!("Scheduled refresh: recent refresh found, skipping tick");
                    continue;
                }
                match refresh.refresh().await {
                    Ok(outcome) => {
                        tracing::info!(total = outcome.total, "Scheduled refresh: done");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Scheduled refresh: failed");
                    }
                }
            }
        }
    }
}

/// Whether `last` falls within half a `period` before `now`.
fn refreshed_recently(last: Option<Timestamp>, now: Timestamp, period: Duration) -> bool {
    let Some(last) = last else {
        return false;
    };
    let Ok(window) = chrono::Duration::from_std(period / 2) else {
        return false;
    };
    now - last < window
}
