use atlas_db::models::country::CountryStatus;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /status
///
/// Row count and the newest `last_refreshed_at` in the store, so the answer
/// survives restarts.
pub async fn get_status(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let total_countries = state.store.count().await?;
    let last_refreshed_at = state.store.latest_refresh().await?;

    Ok(Json(CountryStatus {
        total_countries,
        last_refreshed_at,
    }))
}

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the store does not answer.
    pub status: &'static str,
    pub version: &'static str,
    pub store_healthy: bool,
    /// Whether a refresh has left a summary image to serve.
    pub summary_image: bool,
}

/// GET /health
///
/// Always 200. The in-memory store is always healthy; PostgreSQL is pinged.
pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_healthy = state
        .store
        .health_check()
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "Store health check failed"))
        .is_ok();

    Json(HealthResponse {
        status: if store_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        store_healthy,
        summary_image: state.refresh.summary().exists(),
    })
}
