use atlas_core::summary::DEFAULT_IMAGE_PATH;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `60`). A refresh waits on two
    /// providers and may queue behind another refresh.
    pub request_timeout_secs: u64,
    /// Where the summary image is written and served from.
    pub summary_image_path: String,
    /// Period of the scheduled refresh; `None` disables it.
    pub refresh_interval_secs: Option<u64>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `3000`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`  | `60`                    |
    /// | `SUMMARY_IMAGE_PATH`    | `cache/summary.png`     |
    /// | `REFRESH_INTERVAL_SECS` | unset (disabled)        |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let summary_image_path =
            std::env::var("SUMMARY_IMAGE_PATH").unwrap_or_else(|_| DEFAULT_IMAGE_PATH.into());

        let refresh_interval_secs: Option<u64> = std::env::var("REFRESH_INTERVAL_SECS")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(|v| {
                v.trim()
                    .parse()
                    .expect("REFRESH_INTERVAL_SECS must be a valid u64")
            })
            .filter(|secs| *secs > 0);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            summary_image_path,
            refresh_interval_secs,
        }
    }
}
