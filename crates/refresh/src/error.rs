use atlas_core::types::DataProvider;
use atlas_sources::SourceError;

/// Why a refresh did not complete.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    /// A provider could not be reached or answered with something unusable.
    /// Raised before the store is touched.
    #[error("Could not fetch data from {}", provider.host())]
    ExternalUnavailable {
        provider: DataProvider,
        #[source]
        source: SourceError,
    },

    /// A store call failed. `stage` names the step and `count` how many
    /// writes it carried, so the batch can be reconciled by re-running.
    #[error("Store failure during {stage} ({count} records)")]
    Store {
        stage: &'static str,
        count: usize,
        #[source]
        source: sqlx::Error,
    },
}
