use crate::{
    error::RunError,
    execution::{
        factory,
        window::{resolve_window, state_key},
    },
    report::{ItemReport, RunReport},
};
use engine_config::settings::{RunStateMode, Settings};
use engine_core::{
    connectors::source::LogSource,
    state::{RunStateStore, StateKey},
};
use engine_processing::fetcher::PaginatedFetcher;
use model::core::{timestamp::Timestamp, window::TimeWindow};
use std::{sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

/// Pulls every configured log type once, using the process settings.
pub async fn run(
    settings: &Settings,
    start: Option<Timestamp>,
    cancel: CancellationToken,
) -> Result<RunReport, RunError> {
    let remote = settings.remote()?;
    let client = factory::connect(&remote).await?;

    let orchestrator = Orchestrator::new(OrchestratorParams {
        sources: factory::create_sources(settings, client),
        state: factory::create_state_store(settings),
        fetcher: PaginatedFetcher::new(settings.max_pages),
        lookback: settings.lookback,
        mode: settings.run_state_mode,
        cancel,
    });

    orchestrator.run(start).await
}

pub struct OrchestratorParams {
    pub sources: Vec<LogSource>,
    pub state: Arc<dyn RunStateStore>,
    pub fetcher: PaginatedFetcher,
    pub lookback: Duration,
    pub mode: RunStateMode,
    pub cancel: CancellationToken,
}

/// Runs log types strictly one after another.
///
/// The run state only moves forward once the records it covers have been
/// written: after every type in shared mode, after each type otherwise.
pub struct Orchestrator {
    sources: Vec<LogSource>,
    state: Arc<dyn RunStateStore>,
    fetcher: PaginatedFetcher,
    lookback: Duration,
    mode: RunStateMode,
    cancel: CancellationToken,
}

impl Orchestrator {
    pub fn new(params: OrchestratorParams) -> Self {
        Orchestrator {
            sources: params.sources,
            state: params.state,
            fetcher: params.fetcher,
            lookback: params.lookback,
            mode: params.mode,
            cancel: params.cancel,
        }
    }

    pub async fn run(&self, start: Option<Timestamp>) -> Result<RunReport, RunError> {
        self.run_at(start, Timestamp::now()).await
    }

    /// Same as [`Orchestrator::run`] with an explicit "now".
    pub async fn run_at(
        &self,
        start: Option<Timestamp>,
        now: Timestamp,
    ) -> Result<RunReport, RunError> {
        let run_id = Uuid::new_v4().to_string();
        info!("Run ID: {}", run_id);

        let mut report = RunReport::new(run_id, now);
        let total = self.sources.len();

        // The shared marker is read once; every type then pulls the same window.
        let shared_window = match self.mode {
            RunStateMode::Shared => Some(
                resolve_window(
                    self.state.as_ref(),
                    StateKey::Shared,
                    start,
                    now,
                    self.lookback,
                )
                .await?,
            ),
            RunStateMode::PerLogType => None,
        };

        for (idx, source) in self.sources.iter().enumerate() {
            if self.cancel.is_cancelled() {
                warn!(
                    "Shutdown requested before pulling {} logs ({}/{})",
                    source.log_type(),
                    idx + 1,
                    total
                );
                return Err(RunError::ShutdownRequested);
            }

            let item = match shared_window {
                Some(window) => self.pull(source, window).await?,
                None => {
                    let key = state_key(self.mode, source.log_type());
                    let window =
                        resolve_window(self.state.as_ref(), key, start, now, self.lookback)
                            .await?;
                    let item = self.pull(source, window).await?;
                    self.state.save(key, window.end()).await?;
                    item
                }
            };
            report.items.push(item);
        }

        if self.mode == RunStateMode::Shared {
            self.state.save(StateKey::Shared, now).await?;
        }

        info!(
            "Pulled {} logs across {} log types",
            report.total_records(),
            report.items.len()
        );
        Ok(report)
    }

    async fn pull(&self, source: &LogSource, window: TimeWindow) -> Result<ItemReport, RunError> {
        let log_type = source.log_type();
        info!("Getting logs for {} in {}", log_type, window);

        let outcome = self
            .fetcher
            .fetch(window, source.endpoint())
            .await
            .map_err(|source| RunError::Fetch { log_type, source })?;

        let records_written = source
            .sink()
            .append(&outcome.records)
            .await
            .map_err(|source| RunError::Sink { log_type, source })?;

        Ok(ItemReport {
            log_type,
            window,
            pages: outcome.pages,
            records_written,
            boundary_ties: outcome.boundary_ties,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use connectors::{
        endpoint::LogEndpoint,
        error::{EndpointError, SinkError},
        sink::LogSink,
    };
    use engine_core::state::memory::MemoryRunStateStore;
    use model::{
        core::log_type::LogType, pagination::page::PageResult, records::record::LogRecord,
    };
    use serde_json::json;
    use std::sync::Mutex;

    const NOW: &str = "2024-01-01T00:10:00.000Z";

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    /// Returns one final page, or fails every request.
    struct OnePage {
        log_type: LogType,
        fail: bool,
    }

    #[async_trait]
    impl LogEndpoint for OnePage {
        fn log_type(&self) -> LogType {
            self.log_type
        }

        async fn query(&self, _window: &TimeWindow) -> Result<PageResult, EndpointError> {
            if self.fail {
                return Err(EndpointError::Status {
                    method: "test".into(),
                    status: 500,
                    body: String::new(),
                });
            }
            let record: LogRecord = serde_json::from_value(json!({
                self.log_type.time_key(): "2024-01-01T00:09:00.000Z"
            }))
            .unwrap();
            Ok(PageResult::last(vec![record]))
        }
    }

    #[derive(Default)]
    struct VecSink(Mutex<Vec<LogRecord>>);

    #[async_trait]
    impl LogSink for VecSink {
        fn describe(&self) -> String {
            "memory".into()
        }

        async fn append(&self, records: &[LogRecord]) -> Result<usize, SinkError> {
            self.0.lock().unwrap().extend_from_slice(records);
            Ok(records.len())
        }
    }

    fn source(log_type: LogType, fail: bool) -> LogSource {
        LogSource::new(
            Arc::new(OnePage { log_type, fail }),
            Arc::new(VecSink::default()),
        )
    }

    fn orchestrator(
        sources: Vec<LogSource>,
        state: Arc<MemoryRunStateStore>,
        mode: RunStateMode,
        cancel: CancellationToken,
    ) -> Orchestrator {
        Orchestrator::new(OrchestratorParams {
            sources,
            state,
            fetcher: PaginatedFetcher::default(),
            lookback: Duration::from_secs(600),
            mode,
            cancel,
        })
    }

    #[tokio::test]
    async fn shared_mode_saves_request_end_once() {
        let state = Arc::new(MemoryRunStateStore::new());
        let orch = orchestrator(
            vec![source(LogType::Events, false), source(LogType::Firewall, false)],
            state.clone(),
            RunStateMode::Shared,
            CancellationToken::new(),
        );

        let report = orch.run_at(None, ts(NOW)).await.unwrap();

        assert_eq!(report.items.len(), 2);
        assert_eq!(report.total_records(), 2);
        // The request end, not the newest record time.
        assert_eq!(state.saves(), vec![(StateKey::Shared, ts(NOW))]);
    }

    #[tokio::test]
    async fn shared_mode_reads_the_marker_once() {
        let before = ts("2024-01-01T00:02:00.000Z");
        let state = Arc::new(MemoryRunStateStore::with_value(StateKey::Shared, before));
        let orch = orchestrator(
            vec![
                source(LogType::Events, false),
                source(LogType::Firewall, false),
                source(LogType::Alerts, false),
            ],
            state.clone(),
            RunStateMode::Shared,
            CancellationToken::new(),
        );

        let report = orch.run_at(None, ts(NOW)).await.unwrap();

        assert_eq!(state.loads(), 1);
        assert!(report.items.iter().all(|i| i.window.start() == before));
    }

    #[tokio::test]
    async fn shared_mode_keeps_state_when_a_later_type_fails() {
        let before = ts("2024-01-01T00:00:00.000Z");
        let state = Arc::new(MemoryRunStateStore::with_value(StateKey::Shared, before));
        let orch = orchestrator(
            vec![source(LogType::Events, false), source(LogType::Firewall, true)],
            state.clone(),
            RunStateMode::Shared,
            CancellationToken::new(),
        );

        let err = orch.run_at(None, ts(NOW)).await.unwrap_err();

        assert!(matches!(
            err,
            RunError::Fetch {
                log_type: LogType::Firewall,
                ..
            }
        ));
        assert!(state.saves().is_empty());
        assert_eq!(state.get(StateKey::Shared), Some(before));
    }

    #[tokio::test]
    async fn per_type_mode_keeps_earlier_successes() {
        let state = Arc::new(MemoryRunStateStore::new());
        let orch = orchestrator(
            vec![source(LogType::Events, false), source(LogType::Firewall, true)],
            state.clone(),
            RunStateMode::PerLogType,
            CancellationToken::new(),
        );

        assert!(orch.run_at(None, ts(NOW)).await.is_err());
        assert_eq!(
            state.saves(),
            vec![(StateKey::LogType(LogType::Events), ts(NOW))]
        );
    }

    #[tokio::test]
    async fn cancelled_run_stops_before_next_type() {
        let state = Arc::new(MemoryRunStateStore::new());
        let cancel = CancellationToken::new();
        cancel.cancel();
        let orch = orchestrator(
            vec![source(LogType::Events, false)],
            state.clone(),
            RunStateMode::Shared,
            cancel,
        );

        let err = orch.run_at(None, ts(NOW)).await.unwrap_err();

        assert!(matches!(err, RunError::ShutdownRequested));
        assert!(state.saves().is_empty());
    }
}
