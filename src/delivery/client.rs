use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde_json::Value;

use crate::error::{ReportError, Result};
use crate::models::{DeliveryRequest, DeliveryResult, LocationsSummary};

pub const STORE_LOCATION_PATH: &str = "/api/store-location";
pub const LOCATIONS_PATH: &str = "/api/locations";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Anything that can take a delivery request off a scheduler's hands.
#[async_trait]
pub trait LocationSink: Send + Sync {
    async fn send(&self, request: &DeliveryRequest) -> Result<DeliveryResult>;
}

/// HTTP client for the collector API.
///
/// One attempt per call. Retrying is left to the next scheduled tick.
#[derive(Clone)]
pub struct DeliveryClient {
    http: reqwest::Client,
    base_url: String,
}

impl DeliveryClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ReportError::DeliveryNetworkFailure(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        })
    }

    /// Read the aggregate record count. Used for display only.
    pub async fn fetch_location_count(&self) -> Result<u64> {
        let url = format!("{}{}", self.base_url, LOCATIONS_PATH);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ReportError::DeliveryNetworkFailure(format!("GET {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReportError::DeliveryRejected {
                status: status.as_u16(),
                body,
            });
        }

        let summary: LocationsSummary = response.json().await.map_err(|e| {
            ReportError::DeliveryNetworkFailure(format!("unreadable locations body: {e}"))
        })?;
        Ok(summary.count)
    }
}

#[async_trait]
impl LocationSink for DeliveryClient {
    async fn send(&self, request: &DeliveryRequest) -> Result<DeliveryResult> {
        let url = format!("{}{}", self.base_url, STORE_LOCATION_PATH);
        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ReportError::DeliveryNetworkFailure(format!("POST {url}: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ReportError::DeliveryNetworkFailure(format!("reading response: {e}")))?;

        if !status.is_success() {
            return Err(ReportError::DeliveryRejected {
                status: status.as_u16(),
                body: text,
            });
        }

        let body = serde_json::from_str::<Value>(&text).ok();
        debug!("Collector accepted location with HTTP {}", status.as_u16());

        Ok(DeliveryResult {
            ok: true,
            http_status: Some(status.as_u16()),
            body,
        })
    }
}
