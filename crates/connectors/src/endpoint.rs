use crate::error::EndpointError;
use async_trait::async_trait;
use model::{core::log_type::LogType, core::window::TimeWindow, pagination::page::PageResult};

/// A single remote log, queried one page at a time.
#[async_trait]
pub trait LogEndpoint: Send + Sync {
    fn log_type(&self) -> LogType;

    /// Issues exactly one request for `window` and returns the page as
    /// delivered (newest first).
    async fn query(&self, window: &TimeWindow) -> Result<PageResult, EndpointError>;
}
