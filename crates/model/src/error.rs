use crate::core::timestamp::Timestamp;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The log type identifier does not name a known remote log.
    #[error("Log type '{0}' is unexpected/unsupported")]
    UnsupportedLogType(String),

    #[error("Invalid timestamp '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("Invalid time window: start {start} is after end {end}")]
    InvalidWindow { start: Timestamp, end: Timestamp },
}
