use crate::error::StateError;
use async_trait::async_trait;
use model::core::{log_type::LogType, timestamp::Timestamp};
use std::fmt;

pub mod file_store;
pub mod memory;

/// Which persisted marker a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    /// One marker shared by every log type of a run.
    Shared,
    /// A marker owned by a single log type.
    LogType(LogType),
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateKey::Shared => f.write_str("shared"),
            StateKey::LogType(t) => write!(f, "{t}"),
        }
    }
}

/// Persists the request end-time of the last completed run.
#[async_trait]
pub trait RunStateStore: Send + Sync {
    /// `Ok(None)` when nothing usable is stored: first run, or content that
    /// cannot be parsed.
    async fn load(&self, key: StateKey) -> Result<Option<Timestamp>, StateError>;

    async fn save(&self, key: StateKey, at: Timestamp) -> Result<(), StateError>;
}
