//! Handlers for the `/countries` resource.

use atlas_core::error::CoreError;
use atlas_core::query::CountryFilter;
use axum::extract::{Path, Query, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Raw query string for the list endpoint; validated into a [`CountryFilter`].
#[derive(Debug, Default, Deserialize)]
pub struct ListCountriesParams {
    pub region: Option<String>,
    pub currency: Option<String>,
    pub sort: Option<String>,
}

fn country_not_found(name: String) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Country",
        key: name,
    })
}

/// POST /countries/refresh
///
/// Fetch both providers and merge the result into the store. Waits for any
/// refresh already in progress.
pub async fn refresh_countries(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let outcome = state.refresh.refresh().await?;
    Ok(Json(outcome))
}

/// GET /countries?region=&currency=&sort=
pub async fn list_countries(
    State(state): State<AppState>,
    Query(params): Query<ListCountriesParams>,
) -> AppResult<impl IntoResponse> {
    let filter = CountryFilter::from_params(params.region, params.currency, params.sort)?;
    let countries = state.store.list(&filter).await?;
    Ok(Json(countries))
}

/// GET /countries/{name}
///
/// Name matching ignores case.
pub async fn get_country(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    let country = state
        .store
        .find_by_name(&name)
        .await?
        .ok_or_else(|| country_not_found(name))?;
    Ok(Json(country))
}

/// DELETE /countries/{name}
pub async fn delete_country(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    if !state.store.delete_by_name(&name).await? {
        return Err(country_not_found(name));
    }

    tracing::info!(name = %name, "Country deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /countries/image
///
/// Serve the summary image written by the last successful refresh.
pub async fn get_summary_image(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let summary = state.refresh.summary().clone();
    let bytes = tokio::task::spawn_blocking(move || summary.read())
        .await
        .map_err(|e| AppError::InternalError(format!("Image read task failed: {e}")))??;

    Ok((
        [(CONTENT_TYPE, "image/png"), (CACHE_CONTROL, "no-cache")],
        bytes,
    ))
}
