use connectors::error::{EndpointError, SinkError};
use engine_config::settings::error::SettingsError;
use engine_core::error::StateError;
use engine_processing::error::FetchError;
use model::core::log_type::LogType;
use thiserror::Error;

/// Top-level errors of a pull run. Any of them leaves the run state of the
/// affected log types untouched.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// Building the HTTP client or logging in failed.
    #[error("Connection error: {0}")]
    Connection(#[from] EndpointError),

    #[error("Run state error: {0}")]
    State(#[from] StateError),

    #[error("Failed to fetch {log_type} logs: {source}")]
    Fetch {
        log_type: LogType,
        #[source]
        source: FetchError,
    },

    #[error("Failed to write {log_type} logs: {source}")]
    Sink {
        log_type: LogType,
        #[source]
        source: SinkError,
    },

    #[error("Shutdown requested")]
    ShutdownRequested,
}
