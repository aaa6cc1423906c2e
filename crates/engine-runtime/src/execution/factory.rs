use crate::error::RunError;
use connectors::{
    file::jsonl::sink::JsonLinesSink,
    velocloud::{
        client::{ClientConfig, VelocloudClient},
        endpoint::VelocloudEndpoint,
    },
};
use engine_config::settings::{RemoteSettings, Settings};
use engine_core::{
    connectors::source::LogSource,
    state::{RunStateStore, file_store::FileRunStateStore},
};
use std::sync::Arc;
use tracing::info;

/// Opens an authenticated portal session.
pub async fn connect(remote: &RemoteSettings) -> Result<Arc<VelocloudClient>, RunError> {
    let client = VelocloudClient::new(&ClientConfig {
        host: remote.host.clone(),
        enterprise_id: remote.enterprise_id,
        timeout: remote.request_timeout,
    })?;
    client.login(&remote.credentials).await?;
    Ok(Arc::new(client))
}

/// One source per configured log type, in configured order.
pub fn create_sources(settings: &Settings, client: Arc<VelocloudClient>) -> Vec<LogSource> {
    settings
        .logs_to_pull
        .iter()
        .map(|log_type| {
            let endpoint = VelocloudEndpoint::new(client.clone(), *log_type);
            let sink = JsonLinesSink::new(settings.sink_path(*log_type));
            info!(%log_type, method = endpoint.method(), sink = %sink.path().display(), "Configured log source");
            LogSource::new(Arc::new(endpoint), Arc::new(sink))
        })
        .collect()
}

pub fn create_state_store(settings: &Settings) -> Arc<dyn RunStateStore> {
    Arc::new(FileRunStateStore::new(settings.time_file.clone()))
}
