use crate::{
    error::EndpointError,
    velocloud::types::{Credentials, LoginRequest, PageRequest, PageResponse},
};
use model::{core::window::TimeWindow, pagination::page::PageResult, records::record::LogRecord};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

const PORTAL_PATH: &str = "/portal/rest";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub host: String,
    pub enterprise_id: i64,
    pub timeout: Duration,
}

/// HTTP session against one orchestrator. The session cookie set by
/// [`VelocloudClient::login`] is replayed on every later request.
pub struct VelocloudClient {
    http: Client,
    base_url: String,
    enterprise_id: i64,
}

impl VelocloudClient {
    pub fn new(config: &ClientConfig) -> Result<Self, EndpointError> {
        let http = Client::builder()
            .cookie_store(true)
            .timeout(config.timeout)
            .build()?;

        Ok(VelocloudClient {
            http,
            base_url: portal_url(&config.host),
            enterprise_id: config.enterprise_id,
        })
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<(), EndpointError> {
        let url = format!("{}/{}", self.base_url, credentials.login_path());
        info!(user = %credentials.username, operator = credentials.operator, "Logging in to {}", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(&LoginRequest {
                username: &credentials.username,
                password: &credentials.password,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EndpointError::Authentication(format!(
                "{} returned status {}",
                credentials.login_path(),
                status.as_u16()
            )));
        }

        info!("Portal session established");
        Ok(())
    }

    /// Calls `method` once for `window`.
    pub async fn fetch_page(
        &self,
        method: &str,
        window: &TimeWindow,
    ) -> Result<PageResult, EndpointError> {
        let url = format!("{}/{}", self.base_url, method);
        debug!(method, %window, "Requesting logs");

        let response = self
            .http
            .post(&url)
            .json(&PageRequest::new(self.enterprise_id, window))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(EndpointError::Status {
                method: method.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        decode_page(method, &body)
    }
}

/// Normalises a configured host into the portal API root.
pub fn portal_url(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    let base = if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    };

    if base.ends_with(PORTAL_PATH) {
        base
    } else {
        format!("{base}{PORTAL_PATH}")
    }
}

/// Decodes a log response body. A missing `metaData.more` means no more pages.
/// String fields carrying encoded JSON are expanded before records leave here.
pub(crate) fn decode_page(method: &str, body: &str) -> Result<PageResult, EndpointError> {
    let response: PageResponse =
        serde_json::from_str(body).map_err(|e| EndpointError::Decode {
            method: method.to_string(),
            reason: e.to_string(),
        })?;

    if let Some(error) = response.error {
        return Err(EndpointError::Api {
            method: method.to_string(),
            message: error.to_string(),
        });
    }

    let has_more = response
        .meta_data
        .and_then(|meta| meta.more)
        .unwrap_or(false);

    let records = response
        .data
        .unwrap_or_default()
        .into_iter()
        .map(LogRecord::expand_embedded_json)
        .collect();

    Ok(PageResult::new(records, has_more))
}
