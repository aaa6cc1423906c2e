//! Backward pagination over a time window.
//!
//! The remote API returns the newest records of a window first and only says
//! whether older ones were withheld. Each follow-up request keeps the window
//! start and moves the end back to the earliest timestamp of the page just
//! received. That end is inclusive, so records sharing the boundary timestamp
//! come back again in the next page: duplicates are accepted, gaps are not.

use crate::error::FetchError;
use connectors::endpoint::LogEndpoint;
use model::{
    core::{log_type::LogType, timestamp::Timestamp, window::TimeWindow},
    records::record::LogRecord,
};
use tracing::{debug, info, warn};

/// Default safety ceiling on requests per fetch.
pub const DEFAULT_MAX_PAGES: usize = 10_000;

/// Everything collected for one window.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    /// Pages concatenated in request order, each in delivered order.
    pub records: Vec<LogRecord>,
    pub pages: usize,
    /// Records that sat on a page boundary and were therefore requested twice.
    pub boundary_ties: usize,
}

/// Earliest record time of a page and how many records share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    pub at: Timestamp,
    pub ties: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct PaginatedFetcher {
    max_pages: usize,
}

impl Default for PaginatedFetcher {
    fn default() -> Self {
        PaginatedFetcher::new(DEFAULT_MAX_PAGES)
    }
}

impl PaginatedFetcher {
    /// `max_pages` only guards against an API that never stops reporting
    /// more data; it does not limit a well-behaved one.
    pub fn new(max_pages: usize) -> Self {
        PaginatedFetcher {
            max_pages: max_pages.max(1),
        }
    }

    /// Collects every record the endpoint reports for `window`.
    ///
    /// Any error aborts the whole fetch and nothing collected so far is
    /// returned.
    pub async fn fetch(
        &self,
        window: TimeWindow,
        endpoint: &dyn LogEndpoint,
    ) -> Result<FetchOutcome, FetchError> {
        let log_type = endpoint.log_type();
        let mut current = window;
        let mut records = Vec::new();
        let mut pages = 0;
        let mut boundary_ties = 0;

        loop {
            if pages >= self.max_pages {
                return Err(FetchError::PageLimitExceeded {
                    log_type,
                    pages,
                    boundary: current.end(),
                });
            }
            pages += 1;

            let page = endpoint
                .query(&current)
                .await
                .map_err(|source| FetchError::Endpoint {
                    log_type,
                    page: pages,
                    source,
                })?;

            debug!(
                %log_type,
                page = pages,
                window = %current,
                records = page.len(),
                has_more = page.has_more,
                "Received page"
            );

            if !page.has_more {
                records.extend(page.records);
                break;
            }

            let boundary = earliest_timestamp(&page.records, log_type, pages)?;
            records.extend(page.records);
            boundary_ties += boundary.ties;

            let next = current.narrow_to(boundary.at.ceil_millis());
            if next.end() == current.end() {
                warn!(
                    %log_type,
                    page = pages,
                    boundary = %next.end(),
                    "Page boundary did not move; more records share one timestamp than fit a page"
                );
            }
            current = next;
        }

        info!(
            %log_type,
            %window,
            pages,
            records = records.len(),
            boundary_ties,
            "Fetched logs"
        );

        Ok(FetchOutcome {
            records,
            pages,
            boundary_ties,
        })
    }
}

/// Minimum of the time key over `records`.
///
/// Every record must carry a parseable time key: a single bad record makes
/// the next boundary unknowable.
pub fn earliest_timestamp(
    records: &[LogRecord],
    log_type: LogType,
    page: usize,
) -> Result<Boundary, FetchError> {
    let key = log_type.time_key();
    let mut earliest: Option<Boundary> = None;

    for (index, record) in records.iter().enumerate() {
        let at = record
            .time(key)
            .map_err(|e| FetchError::InvalidTimeKey {
                log_type,
                key,
                page,
                index,
                reason: e.to_string(),
            })?
            .ok_or(FetchError::MissingTimeKey {
                log_type,
                key,
                page,
                index,
            })?;

        earliest = Some(match earliest {
            Some(b) if b.at < at => b,
            Some(b) if b.at == at => Boundary {
                at,
                ties: b.ties + 1,
            },
            _ => Boundary { at, ties: 1 },
        });
    }

    earliest.ok_or(FetchError::EmptyPage { log_type, page })
}
