use axum::routing::{get, post};
use axum::Router;

use crate::handlers::countries;
use crate::state::AppState;

/// Country routes mounted at `/countries`.
///
/// ```text
/// GET    /            -> list_countries
/// POST   /refresh     -> refresh_countries
/// GET    /image       -> get_summary_image
/// GET    /{name}      -> get_country
/// DELETE /{name}      -> delete_country
/// ```
///
/// The literal segments take precedence over `/{name}`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(countries::list_countries))
        .route("/refresh", post(countries::refresh_countries))
        .route("/image", get(countries::get_summary_image))
        .route(
            "/{name}",
            get(countries::get_country).delete(countries::delete_country),
        )
}
