use axum::routing::get;
use axum::Router;

use crate::handlers::status;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/status", get(status::get_status))
        .route("/health", get(status::get_health))
}
