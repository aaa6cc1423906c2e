use connectors::error::EndpointError;
use model::core::{log_type::LogType, timestamp::Timestamp};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    /// A record lacks the field needed to compute the next page boundary.
    #[error("Record {index} of {log_type} page {page} has no '{key}' time key")]
    MissingTimeKey {
        log_type: LogType,
        key: &'static str,
        page: usize,
        index: usize,
    },

    #[error("Record {index} of {log_type} page {page} has an invalid '{key}' value: {reason}")]
    InvalidTimeKey {
        log_type: LogType,
        key: &'static str,
        page: usize,
        index: usize,
        reason: String,
    },

    /// The API asked for another page but gave nothing to derive its boundary from.
    #[error("{log_type} page {page} reported more data but contained no records")]
    EmptyPage { log_type: LogType, page: usize },

    #[error("Gave up on {log_type} after {pages} pages; last boundary {boundary}")]
    PageLimitExceeded {
        log_type: LogType,
        pages: usize,
        boundary: Timestamp,
    },

    #[error("Request for {log_type} page {page} failed: {source}")]
    Endpoint {
        log_type: LogType,
        page: usize,
        #[source]
        source: EndpointError,
    },
}
