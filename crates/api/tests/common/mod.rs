#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use atlas_api::config::ServerConfig;
use atlas_api::router::build_app_router;
use atlas_api::state::AppState;
use atlas_core::gdp::GdpMultiplier;
use atlas_core::summary::SummaryImage;
use atlas_core::types::RateTable;
use atlas_db::models::country::CountryWrite;
use atlas_db::store::MemoryCountryStore;
use atlas_refresh::RefreshService;
use atlas_sources::{
    CountryDirectoryGateway, CurrencyDescriptor, ExchangeRateGateway, RawCountry, SourceError,
};
use axum::body::{Body, Bytes};
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Stub providers
// ---------------------------------------------------------------------------

/// Returns a fixed table, or a provider rejection when `None`.
pub struct StubRates(pub Option<RateTable>);

#[async_trait]
impl ExchangeRateGateway for StubRates {
    async fn fetch_rates(&self) -> Result<RateTable, SourceError> {
        self.0
            .clone()
            .ok_or_else(|| SourceError::Rejected("result was 'error'".into()))
    }
}

/// Returns a fixed country list, or an HTTP 500 when `None`.
pub struct StubDirectory(pub Option<Vec<RawCountry>>);

#[async_trait]
impl CountryDirectoryGateway for StubDirectory {
    async fn fetch_countries(&self) -> Result<Vec<RawCountry>, SourceError> {
        self.0.clone().ok_or_else(|| SourceError::Status {
            status: 500,
            body: "upstream down".into(),
        })
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn raw_country(name: &str, region: &str, population: u64, currency: Option<&str>) -> RawCountry {
    RawCountry {
        name: name.to_string(),
        capital: Some(format!("{name} City")),
        region: Some(region.to_string()),
        population,
        flag: Some(format!("https://flags.test/{name}.svg")),
        currencies: currency.map(|code| {
            vec![CurrencyDescriptor {
                code: Some(code.to_string()),
                name: None,
                symbol: None,
            }]
        }),
    }
}

pub fn default_rates() -> RateTable {
    [
        ("NGN".to_string(), 1600.0),
        ("GHS".to_string(), 15.0),
        ("JPY".to_string(), 150.0),
    ]
    .into_iter()
    .collect()
}

pub fn default_countries() -> Vec<RawCountry> {
    vec![
        raw_country("Nigeria", "Africa", 206_139_589, Some("NGN")),
        raw_country("Ghana", "Africa", 31_072_940, Some("GHS")),
        raw_country("Japan", "Asia", 125_836_021, Some("JPY")),
        raw_country("Antarctica", "Polar", 1_000, None),
        raw_country("Atlantis", "Oceania", 10, Some("XXX")),
    ]
}

pub fn stored(name: &str, region: &str, currency: &str, gdp: Option<f64>) -> CountryWrite {
    CountryWrite {
        name: name.to_string(),
        capital: None,
        region: Some(region.to_string()),
        population: 1_000_000,
        currency_code: Some(currency.to_string()),
        exchange_rate: gdp.map(|_| 1.0),
        estimated_gdp: gdp,
        flag_url: None,
        last_refreshed_at: fixed_instant(),
    }
}

pub fn fixed_instant() -> DateTime<Utc> {
    "2025-01-02T03:04:05Z".parse().unwrap()
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(image_path: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        summary_image_path: image_path.to_string(),
        refresh_interval_secs: None,
    }
}

/// The full router plus handles a test may inspect directly.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryCountryStore>,
    pub refresh: Arc<RefreshService>,
    /// Keeps the summary image directory alive.
    pub dir: TempDir,
}

/// Build the application with the production middleware stack over an
/// in-memory store and stub providers.
pub fn build_test_app(
    store: MemoryCountryStore,
    rates: Option<RateTable>,
    countries: Option<Vec<RawCountry>>,
) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let image_path = dir.path().join("cache/summary.png");
    let config = test_config(image_path.to_str().unwrap());

    let store = Arc::new(store);
    let refresh = Arc::new(
        RefreshService::new(
            Arc::new(StubRates(rates)),
            Arc::new(StubDirectory(countries)),
            store.clone(),
            SummaryImage::new(&image_path),
        )
        .with_multiplier(GdpMultiplier::seeded(5)),
    );

    let state = AppState {
        store: store.clone(),
        refresh: refresh.clone(),
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
        refresh,
        dir,
    }
}

/// App over an empty store whose providers answer with the default fixtures.
pub fn default_app() -> TestApp {
    build_test_app(
        MemoryCountryStore::new(),
        Some(default_rates()),
        Some(default_countries()),
    )
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: &Router, method: Method, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri).await
}

pub async fn post(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri).await
}

pub async fn delete(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri).await
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
