use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The env file could not be read or is malformed.
    #[error("Env file error: {0}")]
    EnvFile(String),

    /// A setting required for the requested operation is not set.
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}
