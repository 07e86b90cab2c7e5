pub mod countries;
pub mod status;

use axum::Router;

use crate::state::AppState;

/// Build the API route tree.
///
/// ```text
/// /countries                  list (GET)
/// /countries/refresh          refresh (POST)
/// /countries/image            summary image (GET)
/// /countries/{name}           get, delete
///
/// /status                     totals and last refresh (GET)
/// /health                     store reachability (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/countries", countries::router())
        .merge(status::router())
}
