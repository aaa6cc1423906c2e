#[cfg(test)]
mod tests {
    use crate::utils::{
        LOOKBACK, MemorySink, ScriptedEndpoint, ids, orchestrator, read_jsonl, record, source, ts,
        window,
    };
    use connectors::{error::EndpointError, file::jsonl::sink::JsonLinesSink};
    use engine_config::{
        env::EnvManager,
        settings::{LOGS_TO_PULL, RunStateMode, Settings, error::SettingsError},
    };
    use engine_core::state::{
        RunStateStore, StateKey, file_store::FileRunStateStore, memory::MemoryRunStateStore,
    };
    use engine_processing::{error::FetchError, fetcher::PaginatedFetcher};
    use engine_runtime::{error::RunError, execution::window::resolve_window};
    use model::{
        core::log_type::LogType, pagination::page::PageResult, records::record::LogRecord,
    };
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::tempdir;
    use tracing_test::traced_test;

    const S: &str = "2024-01-01T00:00:00.000Z";
    const E: &str = "2024-01-01T00:10:00.000Z";
    const T0: &str = "2024-01-01T00:01:00.000Z";
    const T1: &str = "2024-01-01T00:02:00.000Z";
    const T2: &str = "2024-01-01T00:03:00.000Z";

    fn event(id: &str, at: &str) -> LogRecord {
        record(LogType::Events, id, at)
    }

    // Scenario: a single final page with three records.
    // Expected Outcome:
    // - The sink file holds the three records in page order.
    // - The shared run state is the request end, not a record time.
    #[traced_test]
    #[tokio::test]
    async fn single_page_is_written_and_state_advances() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("logs/events.log");
        let state = Arc::new(FileRunStateStore::new(dir.path().join("default_time.log")));
        state.save(StateKey::Shared, ts(S)).await.unwrap();

        let endpoint = ScriptedEndpoint::pages(
            LogType::Events,
            vec![PageResult::last(vec![
                event("r1", T0),
                event("r2", T0),
                event("r3", T1),
            ])],
        );
        let orch = orchestrator(
            vec![source(endpoint.clone(), Arc::new(JsonLinesSink::new(&log_path)))],
            state.clone(),
            RunStateMode::Shared,
        );

        let report = orch.run_at(None, ts(E)).await.unwrap();

        assert_eq!(ids(&read_jsonl(&log_path)), vec!["r1", "r2", "r3"]);
        assert_eq!(endpoint.requests(), vec![window(S, E)]);
        assert_eq!(report.items[0].records_written, 3);
        assert_eq!(state.load(StateKey::Shared).await.unwrap(), Some(ts(E)));
        assert!(logs_contain(&format!("Wrote 3 logs to {}.", log_path.display())));
    }

    // Scenario: two pages whose boundary record (r2 at T1) sits on both pages.
    // Expected Outcome:
    // - r2 is written twice (at-least-once delivery).
    // - The second request keeps the start and ends at T1.
    #[tokio::test]
    async fn boundary_tie_is_written_twice() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("events.log");
        let endpoint = ScriptedEndpoint::pages(
            LogType::Events,
            vec![
                PageResult::new(vec![event("r1", T2), event("r2", T1)], true),
                PageResult::last(vec![event("r2", T1), event("r3", T0)]),
            ],
        );
        let state = Arc::new(MemoryRunStateStore::with_value(StateKey::Shared, ts(S)));
        let orch = orchestrator(
            vec![source(endpoint.clone(), Arc::new(JsonLinesSink::new(&log_path)))],
            state,
            RunStateMode::Shared,
        );

        let report = orch.run_at(None, ts(E)).await.unwrap();

        assert_eq!(ids(&read_jsonl(&log_path)), vec!["r1", "r2", "r2", "r3"]);
        assert_eq!(endpoint.requests(), vec![window(S, E), window(S, T1)]);
        assert_eq!(report.items[0].pages, 2);
        assert_eq!(report.items[0].boundary_ties, 1);
    }

    // Scenario: no run state on disk.
    // Expected Outcome: the window reaches the default lookback into the past.
    #[tokio::test]
    async fn first_run_uses_default_lookback() {
        let dir = tempdir().unwrap();
        let state = FileRunStateStore::new(dir.path().join("default_time.log"));

        let w = resolve_window(&state, StateKey::Shared, None, ts(E), LOOKBACK)
            .await
            .unwrap();

        assert_eq!(w, window(S, E));
    }

    // Scenario: an unsupported log type is configured.
    // Expected Outcome: configuration fails before any endpoint exists.
    #[test]
    fn unsupported_log_type_fails_configuration() {
        let env = EnvManager::from_vars([(LOGS_TO_PULL, "events,widgets")]);

        let err = Settings::from_env(&env).unwrap_err();

        match err {
            SettingsError::InvalidValue { key, reason, .. } => {
                assert_eq!(key, LOGS_TO_PULL);
                assert!(reason.contains("widgets"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    // Scenario: page 2 contains a record without the time key.
    // Expected Outcome:
    // - The run fails with MissingTimeKey.
    // - Nothing is written for that log type and the run state is unchanged.
    #[tokio::test]
    async fn missing_time_key_writes_nothing() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("events.log");
        let state_path = dir.path().join("default_time.log");
        let state = Arc::new(FileRunStateStore::new(&state_path));
        state.save(StateKey::Shared, ts(S)).await.unwrap();

        let no_time: LogRecord = serde_json::from_value(json!({"id": "bad"})).unwrap();
        let endpoint = ScriptedEndpoint::pages(
            LogType::Events,
            vec![
                PageResult::new(vec![event("r1", T2), event("r2", T1)], true),
                PageResult::new(vec![event("r3", T0), no_time], true),
            ],
        );
        let orch = orchestrator(
            vec![source(endpoint, Arc::new(JsonLinesSink::new(&log_path)))],
            state.clone(),
            RunStateMode::Shared,
        );

        let err = orch.run_at(None, ts(E)).await.unwrap_err();

        assert!(matches!(
            err,
            RunError::Fetch {
                log_type: LogType::Events,
                source: FetchError::MissingTimeKey {
                    page: 2,
                    index: 1,
                    ..
                },
            }
        ));
        assert!(!log_path.exists());
        assert_eq!(state.load(StateKey::Shared).await.unwrap(), Some(ts(S)));
    }

    // Scenario: the second page request fails at the transport level.
    // Expected Outcome: the error propagates, and no records or state are written.
    #[tokio::test]
    async fn transport_failure_aborts_without_output() {
        let endpoint = ScriptedEndpoint::new(
            LogType::Events,
            vec![
                Ok(PageResult::new(vec![event("r1", T2)], true)),
                Err(EndpointError::Status {
                    method: "event/getEnterpriseEvents".into(),
                    status: 502,
                    body: "bad gateway".into(),
                }),
            ],
        );
        let sink = MemorySink::new();
        let state = Arc::new(MemoryRunStateStore::new());
        let orch = orchestrator(
            vec![source(endpoint, sink.clone())],
            state.clone(),
            RunStateMode::Shared,
        );

        let err = orch.run_at(None, ts(E)).await.unwrap_err();

        assert!(matches!(
            err,
            RunError::Fetch {
                source: FetchError::Endpoint { page: 2, .. },
                ..
            }
        ));
        assert_eq!(sink.appends(), 0);
        assert!(state.saves().is_empty());
    }

    // Scenario: two consecutive runs against the same state file.
    // Expected Outcome: the second run starts where the first run's window ended.
    #[tokio::test]
    async fn consecutive_runs_resume_from_saved_end() {
        let dir = tempdir().unwrap();
        let state = Arc::new(FileRunStateStore::new(dir.path().join("default_time.log")));
        let later = "2024-01-01T00:20:00.000Z";

        let first = ScriptedEndpoint::pages(LogType::Events, vec![PageResult::last(vec![])]);
        orchestrator(
            vec![source(first.clone(), MemorySink::new())],
            state.clone(),
            RunStateMode::Shared,
        )
        .run_at(None, ts(E))
        .await
        .unwrap();

        let second = ScriptedEndpoint::pages(LogType::Events, vec![PageResult::last(vec![])]);
        orchestrator(
            vec![source(second.clone(), MemorySink::new())],
            state.clone(),
            RunStateMode::Shared,
        )
        .run_at(None, ts(later))
        .await
        .unwrap();

        assert_eq!(first.requests(), vec![window(S, E)]);
        assert_eq!(second.requests(), vec![window(E, later)]);
    }

    // Scenario: the state file holds garbage and two log types are pulled.
    // Expected Outcome:
    // - One warning is logged, since the shared marker is read once per run.
    // - Both types use the default window.
    #[traced_test]
    #[tokio::test]
    async fn unreadable_state_falls_back_to_default_window() {
        let dir = tempdir().unwrap();
        let state_path = dir.path().join("default_time.log");
        std::fs::write(&state_path, "not a timestamp").unwrap();
        let state = Arc::new(FileRunStateStore::new(&state_path));

        let events = ScriptedEndpoint::pages(LogType::Events, vec![PageResult::last(vec![])]);
        let firewall = ScriptedEndpoint::pages(LogType::Firewall, vec![PageResult::last(vec![])]);
        orchestrator(
            vec![
                source(events.clone(), MemorySink::new()),
                source(firewall.clone(), MemorySink::new()),
            ],
            state.clone(),
            RunStateMode::Shared,
        )
        .run_at(None, ts(E))
        .await
        .unwrap();

        assert_eq!(events.requests(), vec![window(S, E)]);
        assert_eq!(firewall.requests(), vec![window(S, E)]);
        logs_assert(|lines: &[&str]| {
            match lines
                .iter()
                .filter(|line| line.contains("Ignoring unreadable run state"))
                .count()
            {
                1 => Ok(()),
                n => Err(format!("expected one unreadable-state warning, saw {n}")),
            }
        });
        assert_eq!(state.load(StateKey::Shared).await.unwrap(), Some(ts(E)));
    }

    // Scenario: per-log-type state, second type fails.
    // Expected Outcome:
    // - The first type's marker file is written next to the time file.
    // - The failing type has no marker.
    #[tokio::test]
    async fn per_type_state_files() {
        let dir = tempdir().unwrap();
        let state_path = dir.path().join("default_time.log");
        let state = Arc::new(FileRunStateStore::new(&state_path));

        let events = ScriptedEndpoint::pages(
            LogType::Events,
            vec![PageResult::last(vec![event("e1", T0)])],
        );
        let firewall = ScriptedEndpoint::new(
            LogType::Firewall,
            vec![Err(EndpointError::Api {
                method: "firewall/getEnterpriseFirewallLogs".into(),
                message: "denied".into(),
            })],
        );
        let orch = orchestrator(
            vec![
                source(events, MemorySink::new()),
                source(firewall, MemorySink::new()),
            ],
            state.clone(),
            RunStateMode::PerLogType,
        );

        assert!(orch.run_at(None, ts(E)).await.is_err());

        let events_marker = dir.path().join("default_time.log.events");
        assert_eq!(std::fs::read_to_string(events_marker).unwrap(), E);
        assert!(!dir.path().join("default_time.log.firewall").exists());
        assert!(!state_path.exists());
    }

    // Scenario: an explicit start is given while state exists.
    // Expected Outcome: the override is used, and the state still advances on success.
    #[tokio::test]
    async fn start_override_bypasses_state() {
        let state = Arc::new(MemoryRunStateStore::with_value(StateKey::Shared, ts(T2)));
        let endpoint = ScriptedEndpoint::pages(LogType::Alerts, vec![PageResult::last(vec![])]);

        orchestrator(
            vec![source(endpoint.clone(), MemorySink::new())],
            state.clone(),
            RunStateMode::Shared,
        )
        .run_at(Some(ts(S)), ts(E))
        .await
        .unwrap();

        assert_eq!(endpoint.requests(), vec![window(S, E)]);
        assert_eq!(state.get(StateKey::Shared), Some(ts(E)));
    }

    // Scenario: an endpoint that never stops reporting more data.
    // Expected Outcome: the fetch stops at the page ceiling with PageLimitExceeded.
    #[tokio::test]
    async fn page_ceiling_stops_runaway_pagination() {
        let pages = (0..10)
            .map(|_| PageResult::new(vec![event("x", T1)], true))
            .collect();
        let endpoint = ScriptedEndpoint::pages(LogType::Events, pages);

        let err = PaginatedFetcher::new(5)
            .fetch(window(S, E), endpoint.as_ref())
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::PageLimitExceeded { pages: 5, .. }));
        assert_eq!(endpoint.requests().len(), 5);
    }
}
