use std::{fmt, str::FromStr};

/// How run-state markers are scoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunStateMode {
    /// One marker for all log types, advanced only when every type succeeded.
    #[default]
    Shared,
    /// One marker per log type, advanced as soon as that type succeeded.
    PerLogType,
}

impl FromStr for RunStateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shared" => Ok(RunStateMode::Shared),
            "per-type" | "per_type" | "per-log-type" => Ok(RunStateMode::PerLogType),
            other => Err(format!("unknown run state mode: {other}")),
        }
    }
}

impl fmt::Display for RunStateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStateMode::Shared => f.write_str("shared"),
            RunStateMode::PerLogType => f.write_str("per-type"),
        }
    }
}
