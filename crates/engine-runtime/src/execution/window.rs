use crate::error::RunError;
use engine_config::settings::RunStateMode;
use engine_core::state::{RunStateStore, StateKey};
use model::core::{log_type::LogType, timestamp::Timestamp, window::TimeWindow};
use std::time::Duration;
use tracing::info;

/// State marker consulted for `log_type` under `mode`.
pub fn state_key(mode: RunStateMode, log_type: LogType) -> StateKey {
    match mode {
        RunStateMode::Shared => StateKey::Shared,
        RunStateMode::PerLogType => StateKey::LogType(log_type),
    }
}

/// Window for a run ending at `now`: an explicit start wins, then the
/// persisted marker, then the default lookback.
pub async fn resolve_window(
    state: &dyn RunStateStore,
    key: StateKey,
    start_override: Option<Timestamp>,
    now: Timestamp,
    lookback: Duration,
) -> Result<TimeWindow, RunError> {
    let start = match start_override {
        Some(start) => Some(start),
        None => state.load(key).await?,
    };

    if start.is_none() {
        info!(%key, lookback_secs = lookback.as_secs(), "No previous run state, using default window");
    }

    Ok(TimeWindow::derive(start, now, lookback))
}

/// The windows a run at `now` would request, without fetching anything.
pub async fn preview(
    state: &dyn RunStateStore,
    mode: RunStateMode,
    log_types: &[LogType],
    start_override: Option<Timestamp>,
    now: Timestamp,
    lookback: Duration,
) -> Result<Vec<(LogType, TimeWindow)>, RunError> {
    let mut windows = Vec::with_capacity(log_types.len());
    for log_type in log_types {
        let key = state_key(mode, *log_type);
        let window = resolve_window(state, key, start_override, now, lookback).await?;
        windows.push((*log_type, window));
    }
    Ok(windows)
}
