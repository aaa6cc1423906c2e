use crate::{core::timestamp::Timestamp, error::ModelError};
use serde::Serialize;
use std::time::Duration;

/// Lookback applied when no start time is known.
pub const DEFAULT_LOOKBACK: Duration = Duration::from_secs(600);

/// Inclusive `[start, end]` query range.
///
/// `start <= end` always holds; a window is never modified in place,
/// narrowing produces a new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    start: Timestamp,
    end: Timestamp,
}

impl TimeWindow {
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, ModelError> {
        if start > end {
            return Err(ModelError::InvalidWindow { start, end });
        }
        Ok(TimeWindow { start, end })
    }

    /// Window for a run ending at `now`.
    ///
    /// Without a known `start` the window reaches `lookback` into the past.
    /// A `start` later than `now` collapses the window onto `now`.
    pub fn derive(start: Option<Timestamp>, now: Timestamp, lookback: Duration) -> Self {
        let start = start
            .unwrap_or_else(|| now.saturating_sub(lookback))
            .min(now);
        TimeWindow { start, end: now }
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Timestamp {
        self.end
    }

    /// Same start, new end clamped into the current window, so successive
    /// narrowing never moves `end` forward or before `start`.
    pub fn narrow_to(&self, end: Timestamp) -> Self {
        TimeWindow {
            start: self.start,
            end: end.clamp(self.start, self.end),
        }
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
