use async_trait::async_trait;
use connectors::{
    endpoint::LogEndpoint,
    error::{EndpointError, SinkError},
    sink::LogSink,
};
use engine_config::settings::RunStateMode;
use engine_core::{connectors::source::LogSource, state::RunStateStore};
use engine_processing::fetcher::PaginatedFetcher;
use engine_runtime::execution::executor::{Orchestrator, OrchestratorParams};
use model::{
    core::{log_type::LogType, timestamp::Timestamp, window::TimeWindow},
    pagination::page::PageResult,
    records::record::LogRecord,
};
use serde_json::{Value, json};
use std::{
    collections::VecDeque,
    path::Path,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio_util::sync::CancellationToken;

pub const LOOKBACK: Duration = Duration::from_secs(600);

pub fn ts(s: &str) -> Timestamp {
    Timestamp::parse(s).unwrap()
}

pub fn window(start: &str, end: &str) -> TimeWindow {
    TimeWindow::new(ts(start), ts(end)).unwrap()
}

/// A record of `log_type` with an `id` and its time key set to `at`.
pub fn record(log_type: LogType, id: &str, at: &str) -> LogRecord {
    let mut fields = serde_json::Map::new();
    fields.insert("id".into(), json!(id));
    fields.insert(log_type.time_key().into(), json!(at));
    LogRecord::new(fields)
}

pub fn ids(records: &[LogRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.get("id").and_then(Value::as_str).unwrap_or_default().to_string())
        .collect()
}

/// Reads a JSON lines file back into records. A missing file reads as empty.
pub fn read_jsonl(path: &Path) -> Vec<LogRecord> {
    match std::fs::read_to_string(path) {
        Ok(content) => content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(e) => panic!("failed to read {}: {e}", path.display()),
    }
}

/// Replays scripted pages in order and records every requested window.
pub struct ScriptedEndpoint {
    log_type: LogType,
    responses: Mutex<VecDeque<Result<PageResult, EndpointError>>>,
    requests: Mutex<Vec<TimeWindow>>,
}

impl ScriptedEndpoint {
    pub fn new(log_type: LogType, responses: Vec<Result<PageResult, EndpointError>>) -> Arc<Self> {
        Arc::new(Self {
            log_type,
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn pages(log_type: LogType, pages: Vec<PageResult>) -> Arc<Self> {
        Self::new(log_type, pages.into_iter().map(Ok).collect())
    }

    pub fn requests(&self) -> Vec<TimeWindow> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LogEndpoint for ScriptedEndpoint {
    fn log_type(&self) -> LogType {
        self.log_type
    }

    async fn query(&self, window: &TimeWindow) -> Result<PageResult, EndpointError> {
        self.requests.lock().unwrap().push(*window);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(PageResult::last(Vec::new())))
    }
}

/// Keeps appended records in memory.
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
    appends: Mutex<usize>,
}

impl MemorySink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn appends(&self) -> usize {
        *self.appends.lock().unwrap()
    }
}

#[async_trait]
impl LogSink for MemorySink {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    async fn append(&self, records: &[LogRecord]) -> Result<usize, SinkError> {
        self.records.lock().unwrap().extend_from_slice(records);
        *self.appends.lock().unwrap() += 1;
        Ok(records.len())
    }
}

pub fn source(endpoint: Arc<dyn LogEndpoint>, sink: Arc<dyn LogSink>) -> LogSource {
    LogSource::new(endpoint, sink)
}

pub fn orchestrator(
    sources: Vec<LogSource>,
    state: Arc<dyn RunStateStore>,
    mode: RunStateMode,
) -> Orchestrator {
    Orchestrator::new(OrchestratorParams {
        sources,
        state,
        fetcher: PaginatedFetcher::default(),
        lookback: LOOKBACK,
        mode,
        cancel: CancellationToken::new(),
    })
}
