use crate::error::ModelError;
use chrono::{DateTime, NaiveDateTime, SubsecRound, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr, time::Duration};

/// Textual format used by the remote API for interval bounds and by the
/// persisted run-state file.
pub const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Accepts any number of fractional digits (including none).
const PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// An absolute UTC instant.
///
/// Ordering is chronological. Formatting always uses [`WIRE_FORMAT`], so a
/// value round-trips through the wire and the state file at millisecond
/// resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().trunc_subsecs(3))
    }

    /// Parses the wire format, falling back to RFC 3339 with an explicit
    /// offset for records that carry one.
    pub fn parse(value: &str) -> Result<Self, ModelError> {
        let trimmed = value.trim();

        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, PARSE_FORMAT) {
            return Ok(Self(naive.and_utc()));
        }

        DateTime::parse_from_rfc3339(trimmed)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|e| ModelError::InvalidTimestamp {
                value: value.to_string(),
                reason: e.to_string(),
            })
    }

    /// Subtracts `delta`, saturating at the earliest representable instant.
    pub fn saturating_sub(self, delta: Duration) -> Self {
        TimeDelta::from_std(delta)
            .ok()
            .and_then(|d| self.0.checked_sub_signed(d))
            .map(Self)
            .unwrap_or(Self(DateTime::<Utc>::MIN_UTC))
    }

    /// Rounds up to the next whole millisecond.
    ///
    /// A boundary taken from a record with sub-millisecond precision must not
    /// fall before that record once it is rendered in [`WIRE_FORMAT`].
    pub fn ceil_millis(self) -> Self {
        let truncated = self.0.trunc_subsecs(3);
        if truncated == self.0 {
            return self;
        }
        truncated
            .checked_add_signed(TimeDelta::milliseconds(1))
            .map(Self)
            .unwrap_or(Self(truncated))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(WIRE_FORMAT))
    }
}

impl FromStr for Timestamp {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timestamp::parse(s)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp(dt)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_in_wire_format() {
        let ts = Timestamp::parse("2018-11-19T18:42:23.007Z").unwrap();
        assert_eq!(ts.to_string(), "2018-11-19T18:42:23.007Z");
    }

    #[test]
    fn parses_without_fraction_and_with_offset() {
        let bare = Timestamp::parse("2024-01-01T00:10:00Z").unwrap();
        let offset = Timestamp::parse("2024-01-01T01:10:00+01:00").unwrap();
        assert_eq!(bare, offset);
        assert_eq!(bare.to_string(), "2024-01-01T00:10:00.000Z");
    }

    #[test]
    fn rejects_garbage() {
        let err = Timestamp::parse("yesterday").unwrap_err();
        assert!(matches!(err, ModelError::InvalidTimestamp { .. }));
    }

    #[test]
    fn orders_chronologically() {
        let a = Timestamp::parse("2024-01-01T00:00:00.001Z").unwrap();
        let b = Timestamp::parse("2024-01-01T00:00:00.002Z").unwrap();
        assert!(a < b);
        assert_eq!(a.min(b), a);
    }

    #[test]
    fn subtracts_lookback() {
        let now = Timestamp::parse("2024-01-01T00:10:00.000Z").unwrap();
        let start = now.saturating_sub(Duration::from_secs(600));
        assert_eq!(start.to_string(), "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn ceil_millis_rounds_sub_millisecond_values_up() {
        let exact = Timestamp::parse("2024-01-01T00:00:00.007Z").unwrap();
        assert_eq!(exact.ceil_millis(), exact);

        let fine = Timestamp::parse("2024-01-01T00:00:00.007500Z").unwrap();
        assert_eq!(fine.ceil_millis().to_string(), "2024-01-01T00:00:00.008Z");
    }

    #[test]
    fn serde_uses_wire_string() {
        let ts = Timestamp::parse("2024-01-01T00:00:00.000Z").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2024-01-01T00:00:00.000Z\"");
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }
}
