use crate::error::SinkError;
use async_trait::async_trait;
use model::records::record::LogRecord;

/// Append-only destination for the records of one log type.
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Human readable location, used in log lines.
    fn describe(&self) -> String;

    /// Appends `records` in the given order and returns how many were written.
    /// An empty slice is a no-op.
    async fn append(&self, records: &[LogRecord]) -> Result<usize, SinkError>;
}
