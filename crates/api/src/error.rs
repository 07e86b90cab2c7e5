use atlas_core::error::CoreError;
use atlas_refresh::RefreshError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`RefreshError`] for the refresh
/// pipeline. Implements [`IntoResponse`] to produce consistent JSON error
/// responses:
///
/// ```json
/// { "error": "...", "code": "...", "details": "..." }
/// ```
///
/// `details` is present only where there is something to add.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `atlas_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A refresh that did not complete.
    #[error(transparent)]
    Refresh(#[from] RefreshError),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, key } => {
                    tracing::debug!(entity = *entity, key = %key, "Lookup missed");
                    (
                        StatusCode::NOT_FOUND,
                        "NOT_FOUND",
                        format!("{entity} not found"),
                        None,
                    )
                }
                CoreError::InvalidArgument { field, .. } => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    format!("Invalid {field} parameter"),
                    Some(core.to_string()),
                ),
                CoreError::ArtifactWriteFailed(msg) | CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Refresh pipeline ---
            AppError::Refresh(refresh) => match refresh {
                RefreshError::ExternalUnavailable { provider, source } => {
                    tracing::warn!(%provider, error = %source, "External data source unavailable");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "SERVICE_UNAVAILABLE",
                        "External data source unavailable".to_string(),
                        Some(refresh.to_string()),
                    )
                }
                RefreshError::Store {
                    stage,
                    count,
                    source,
                } => {
                    tracing::error!(
                        stage = *stage,
                        count = *count,
                        error = %source,
                        "Refresh store failure"
                    );
                    internal()
                }
            },

            // --- Database errors ---
            AppError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                internal()
            }

            // --- Handler-local failures ---
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(details) = details {
            body["details"] = json!(details);
        }

        (status, axum::Json(body)).into_response()
    }
}

/// 500 with a sanitized message; the cause is logged, never returned.
fn internal() -> (StatusCode, &'static str, String, Option<String>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
        None,
    )
}
