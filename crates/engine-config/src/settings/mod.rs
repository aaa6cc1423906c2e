use crate::{env::EnvManager, settings::error::SettingsError};
use connectors::velocloud::types::Credentials;
use model::core::{log_type::LogType, window::DEFAULT_LOOKBACK};
use std::{collections::HashMap, path::PathBuf, str::FromStr, time::Duration};

pub mod error;
pub mod mode;

pub use mode::RunStateMode;

pub const HOST: &str = "VELOCLOUD_HOST";
pub const ENTERPRISE_ID: &str = "VELOCLOUD_ENTERPRISE_ID";
pub const ENTERPRISE_USERNAME: &str = "VELOCLOUD_ENTERPRISE_USERNAME";
pub const ENTERPRISE_PASSWORD: &str = "VELOCLOUD_ENTERPRISE_PASSWORD";
pub const OPERATOR_USERNAME: &str = "VELOCLOUD_OPERATOR_USERNAME";
pub const OPERATOR_PASSWORD: &str = "VELOCLOUD_OPERATOR_PASSWORD";
pub const TIME_FILE: &str = "VELOCLOUD_TIME_FILE";
pub const LOG_DIRECTORY: &str = "VELOCLOUD_LOG_DIRECTORY";
pub const LOGS_TO_PULL: &str = "VELOCLOUD_LOGS_TO_PULL";
pub const DEFAULT_TIME_DELTA: &str = "VELOCLOUD_DEFAULT_TIME_DELTA";
pub const MAX_PAGES: &str = "VELOCLOUD_MAX_PAGES";
pub const REQUEST_TIMEOUT: &str = "VELOCLOUD_REQUEST_TIMEOUT";
pub const RUN_STATE_MODE: &str = "VELOCLOUD_RUN_STATE_MODE";
pub const SCRIPT_LOG_FILE: &str = "VELOCLOUD_SCRIPT_LOG_FILE";
pub const LOG_LEVEL: &str = "VELOCLOUD_LOG_LEVEL";

const DEFAULT_TIME_FILE: &str = "default_time.log";
const DEFAULT_LOG_DIRECTORY: &str = "logs";
const DEFAULT_MAX_PAGES: usize = 10_000;
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_LOG_LEVEL: &str = "info";

/// Per-log-type sink file override, e.g. `VELOCLOUD_FIREWALL_LOG_FILE`.
fn sink_file_key(log_type: LogType) -> &'static str {
    match log_type {
        LogType::Events => "VELOCLOUD_EVENTS_LOG_FILE",
        LogType::Firewall => "VELOCLOUD_FIREWALL_LOG_FILE",
        LogType::Alerts => "VELOCLOUD_ALERTS_LOG_FILE",
    }
}

/// Connection details, only needed when talking to the orchestrator.
#[derive(Debug, Clone)]
pub struct RemoteSettings {
    pub host: String,
    pub enterprise_id: i64,
    pub credentials: Credentials,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Settings {
    host: Option<String>,
    enterprise_id: Option<i64>,
    enterprise_credentials: Option<Credentials>,
    operator_credentials: Option<Credentials>,
    pub time_file: PathBuf,
    pub log_directory: PathBuf,
    pub logs_to_pull: Vec<LogType>,
    pub lookback: Duration,
    pub max_pages: usize,
    pub request_timeout: Duration,
    pub run_state_mode: RunStateMode,
    pub script_log_file: Option<PathBuf>,
    pub log_level: String,
    sink_files: HashMap<LogType, PathBuf>,
}

impl Settings {
    pub fn from_env(env: &EnvManager) -> Result<Self, SettingsError> {
        let logs_to_pull = match env.get(LOGS_TO_PULL) {
            Some(raw) => parse_log_types(LOGS_TO_PULL, raw)?,
            None => vec![LogType::Events, LogType::Firewall],
        };

        let sink_files = LogType::ALL
            .iter()
            .filter_map(|t| env.get(sink_file_key(*t)).map(|p| (*t, PathBuf::from(p))))
            .collect();

        Ok(Settings {
            host: env.get(HOST).map(str::to_string),
            enterprise_id: parse_opt(env, ENTERPRISE_ID)?,
            enterprise_credentials: credentials(env, ENTERPRISE_USERNAME, ENTERPRISE_PASSWORD)?
                .map(|(u, p)| Credentials::enterprise(u, p)),
            operator_credentials: credentials(env, OPERATOR_USERNAME, OPERATOR_PASSWORD)?
                .map(|(u, p)| Credentials::operator(u, p)),
            time_file: PathBuf::from(env.get(TIME_FILE).unwrap_or(DEFAULT_TIME_FILE)),
            log_directory: PathBuf::from(env.get(LOG_DIRECTORY).unwrap_or(DEFAULT_LOG_DIRECTORY)),
            logs_to_pull,
            lookback: parse_opt::<u64>(env, DEFAULT_TIME_DELTA)?
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_LOOKBACK),
            max_pages: parse_opt(env, MAX_PAGES)?.unwrap_or(DEFAULT_MAX_PAGES),
            request_timeout: parse_opt::<u64>(env, REQUEST_TIMEOUT)?
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            run_state_mode: parse_opt(env, RUN_STATE_MODE)?.unwrap_or_default(),
            script_log_file: env.get(SCRIPT_LOG_FILE).map(PathBuf::from),
            log_level: env.get(LOG_LEVEL).unwrap_or(DEFAULT_LOG_LEVEL).to_string(),
            sink_files,
        })
    }

    /// Replaces the configured log types, e.g. from a command line flag.
    pub fn set_logs_to_pull(&mut self, raw: &str) -> Result<(), SettingsError> {
        self.logs_to_pull = parse_log_types(LOGS_TO_PULL, raw)?;
        Ok(())
    }

    /// Where records of `log_type` are appended.
    pub fn sink_path(&self, log_type: LogType) -> PathBuf {
        self.sink_files
            .get(&log_type)
            .cloned()
            .unwrap_or_else(|| self.log_directory.join(log_type.default_file_name()))
    }

    /// Enterprise credentials win when both kinds are configured.
    pub fn remote(&self) -> Result<RemoteSettings, SettingsError> {
        let host = self.host.clone().ok_or(SettingsError::Missing(HOST))?;
        let enterprise_id = self
            .enterprise_id
            .ok_or(SettingsError::Missing(ENTERPRISE_ID))?;
        let credentials = self
            .enterprise_credentials
            .clone()
            .or_else(|| self.operator_credentials.clone())
            .ok_or(SettingsError::Missing(ENTERPRISE_USERNAME))?;

        Ok(RemoteSettings {
            host,
            enterprise_id,
            credentials,
            request_timeout: self.request_timeout,
        })
    }
}

fn parse_log_types(key: &'static str, raw: &str) -> Result<Vec<LogType>, SettingsError> {
    let types = LogType::parse_list(raw).map_err(|e| SettingsError::InvalidValue {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })?;

    if types.is_empty() {
        return Err(SettingsError::InvalidValue {
            key,
            value: raw.to_string(),
            reason: "at least one log type is required".to_string(),
        });
    }
    Ok(types)
}

fn parse_opt<T>(env: &EnvManager, key: &'static str) -> Result<Option<T>, SettingsError>
where
    T: FromStr,
    T::Err: ToString,
{
    env.get(key)
        .map(|raw| {
            raw.parse::<T>().map_err(|e| SettingsError::InvalidValue {
                key,
                value: raw.to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

/// Both halves or neither.
fn credentials(
    env: &EnvManager,
    user_key: &'static str,
    password_key: &'static str,
) -> Result<Option<(String, String)>, SettingsError> {
    match (env.get(user_key), env.get(password_key)) {
        (Some(user), Some(password)) => Ok(Some((user.to_string(), password.to_string()))),
        (None, None) => Ok(None),
        (Some(_), None) => Err(SettingsError::Missing(password_key)),
        (None, Some(_)) => Err(SettingsError::Missing(user_key)),
    }
}
