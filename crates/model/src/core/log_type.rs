use crate::error::ModelError;
use serde::Serialize;
use std::{fmt, str::FromStr};

/// The closed set of remote logs that can be pulled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogType {
    Events,
    Firewall,
    Alerts,
}

impl LogType {
    pub const ALL: [LogType; 3] = [LogType::Events, LogType::Firewall, LogType::Alerts];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogType::Events => "events",
            LogType::Firewall => "firewall",
            LogType::Alerts => "alerts",
        }
    }

    /// Record field holding the timestamp used as the pagination boundary.
    pub fn time_key(&self) -> &'static str {
        match self {
            LogType::Events => "eventTime",
            LogType::Firewall => "timestamp",
            LogType::Alerts => "created",
        }
    }

    pub fn default_file_name(&self) -> &'static str {
        match self {
            LogType::Events => "events.log",
            LogType::Firewall => "firewall.log",
            LogType::Alerts => "alerts.log",
        }
    }

    /// Parses a comma separated list, dropping repeats and keeping the
    /// first-seen order.
    pub fn parse_list(value: &str) -> Result<Vec<LogType>, ModelError> {
        let mut types = Vec::new();
        for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let log_type = part.parse::<LogType>()?;
            if !types.contains(&log_type) {
                types.push(log_type);
            }
        }
        Ok(types)
    }
}

impl FromStr for LogType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "events" => Ok(LogType::Events),
            "firewall" => Ok(LogType::Firewall),
            "alerts" => Ok(LogType::Alerts),
            other => Err(ModelError::UnsupportedLogType(other.to_string())),
        }
    }
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
