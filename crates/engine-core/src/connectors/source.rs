use connectors::{endpoint::LogEndpoint, sink::LogSink};
use model::core::log_type::LogType;
use std::sync::Arc;

/// Everything needed to pull one log type: where to read it and where it goes.
#[derive(Clone)]
pub struct LogSource {
    log_type: LogType,
    endpoint: Arc<dyn LogEndpoint>,
    sink: Arc<dyn LogSink>,
}

impl LogSource {
    /// The log type is taken from the endpoint.
    pub fn new(endpoint: Arc<dyn LogEndpoint>, sink: Arc<dyn LogSink>) -> Self {
        LogSource {
            log_type: endpoint.log_type(),
            endpoint,
            sink,
        }
    }

    pub fn log_type(&self) -> LogType {
        self.log_type
    }

    pub fn endpoint(&self) -> &dyn LogEndpoint {
        self.endpoint.as_ref()
    }

    pub fn sink(&self) -> &dyn LogSink {
        self.sink.as_ref()
    }
}

impl std::fmt::Debug for LogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSource")
            .field("log_type", &self.log_type)
            .field("sink", &self.sink.describe())
            .finish()
    }
}
