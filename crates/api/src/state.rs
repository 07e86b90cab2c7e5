use std::sync::Arc;

use atlas_db::store::CountryStore;
use atlas_refresh::RefreshService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Country records, PostgreSQL-backed or in-memory.
    pub store: Arc<dyn CountryStore>,
    /// Refresh pipeline writing into `store`; also owns the summary image.
    pub refresh: Arc<RefreshService>,
}
