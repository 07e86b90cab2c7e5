#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} named '{key}'")]
    NotFound { entity: &'static str, key: String },

    #[error("Invalid value '{value}' for {field}")]
    InvalidArgument { field: &'static str, value: String },

    #[error("Summary artifact write failed: {0}")]
    ArtifactWriteFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
