use engine_config::settings::error::SettingsError;
use engine_core::error::StateError;
use engine_runtime::error::RunError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Failed to pull logs: {0}")]
    Run(#[from] RunError),

    #[error("Failed to read run state: {0}")]
    State(#[from] StateError),

    #[error("Failed to open log file {path}: {source}")]
    LogFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),
}

impl CliError {
    pub fn is_shutdown(&self) -> bool {
        matches!(self, CliError::Run(RunError::ShutdownRequested))
    }
}
