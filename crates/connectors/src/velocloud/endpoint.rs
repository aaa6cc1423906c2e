use crate::{endpoint::LogEndpoint, error::EndpointError, velocloud::client::VelocloudClient};
use async_trait::async_trait;
use model::{core::log_type::LogType, core::window::TimeWindow, pagination::page::PageResult};
use std::sync::Arc;

/// Remote method serving each log type.
pub fn remote_method(log_type: LogType) -> &'static str {
    match log_type {
        LogType::Events => "event/getEnterpriseEvents",
        LogType::Firewall => "firewall/getEnterpriseFirewallLogs",
        LogType::Alerts => "enterprise/getEnterpriseAlerts",
    }
}

/// One log type bound to a shared portal session.
#[derive(Clone)]
pub struct VelocloudEndpoint {
    client: Arc<VelocloudClient>,
    log_type: LogType,
}

impl VelocloudEndpoint {
    pub fn new(client: Arc<VelocloudClient>, log_type: LogType) -> Self {
        VelocloudEndpoint { client, log_type }
    }

    pub fn method(&self) -> &'static str {
        remote_method(self.log_type)
    }
}

#[async_trait]
impl LogEndpoint for VelocloudEndpoint {
    fn log_type(&self) -> LogType {
        self.log_type
    }

    async fn query(&self, window: &TimeWindow) -> Result<PageResult, EndpointError> {
        self.client.fetch_page(self.method(), window).await
    }
}
