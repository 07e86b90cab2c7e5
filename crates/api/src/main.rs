use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use atlas_core::summary::SummaryImage;
use atlas_db::store::{CountryStore, MemoryCountryStore, PgCountryStore};
use atlas_refresh::RefreshService;
use atlas_sources::SourcesConfig;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use atlas_api::background;
use atlas_api::config::ServerConfig;
use atlas_api::router::build_app_router;
use atlas_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "atlas_api=debug,atlas_refresh=debug,atlas_sources=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let sources = SourcesConfig::from_env();
    tracing::info!(
        exchange_rates_url = %sources.exchange_rates_url,
        countries_url = %sources.countries_url,
        timeout_secs = sources.timeout_secs,
        "Loaded source configuration"
    );

    // --- Store ---
    let store = connect_store().await;

    // --- Refresh pipeline ---
    let http = sources
        .build_client()
        .expect("Failed to build HTTP client");
    let refresh = Arc::new(RefreshService::new(
        Arc::new(sources.exchange_rate_client(http.clone())),
        Arc::new(sources.country_directory_client(http)),
        Arc::clone(&store),
        SummaryImage::new(&config.summary_image_path),
    ));

    // --- Scheduled refresh ---
    let cancel = CancellationToken::new();
    let scheduler_handle = config.refresh_interval_secs.map(|secs| {
        tokio::spawn(background::scheduled_refresh::run(
            Arc::clone(&refresh),
            Duration::from_secs(secs),
            cancel.clone(),
        ))
    });

    // --- App state ---
    let state = AppState { store, refresh };
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    cancel.cancel();
    if let Some(handle) = scheduler_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        tracing::info!("Scheduled refresh stopped");
    }

    tracing::info!("Graceful shutdown complete");
}

/// PostgreSQL when `DATABASE_URL` is set, otherwise a process-local store.
async fn connect_store() -> Arc<dyn CountryStore> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        tracing::warn!("DATABASE_URL not set; using in-memory store, data is lost on restart");
        return Arc::new(MemoryCountryStore::new());
    };

    let pool = atlas_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    atlas_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    atlas_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    Arc::new(PgCountryStore::new(pool))
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
