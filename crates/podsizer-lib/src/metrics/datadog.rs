//! HTTP client for the Datadog metrics query API
//!
//! Issues `GET /api/v1/query` with the time range as Unix seconds and the
//! API/application keys as headers, then decodes the `series` payload.

use super::MetricsClient;
use crate::config::{PodsizerConfig, DEFAULT_API_URL};
use crate::error::{PodsizerError, Result};
use crate::models::{QueryWindow, Sample, Series};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

const QUERY_PATH: &str = "api/v1/query";
const API_KEY_HEADER: &str = "DD-API-KEY";
const APP_KEY_HEADER: &str = "DD-APPLICATION-KEY";

/// Datadog-backed metrics client
pub struct DatadogClient {
    client: Client,
    base_url: Url,
    api_key: String,
    app_key: String,
}

impl DatadogClient {
    /// Create a client from a validated configuration
    pub fn from_config(config: &PodsizerConfig) -> Result<Self> {
        DatadogClientBuilder::new()
            .api_url(config.api_url.clone())
            .api_key(config.credentials.api_key.clone())
            .app_key(config.credentials.app_key.clone())
            .request_timeout(config.query_timeout)
            .build()
    }

    /// Get the API base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn decode(query: &str, response: QueryResponse) -> Result<Vec<Series>> {
        if response.status.as_deref() == Some("error") || response.error.is_some() {
            let message = response
                .error
                .unwrap_or_else(|| "backend reported status error".to_string());
            return Err(PodsizerError::query(query, message));
        }

        Ok(response.series.into_iter().map(Series::from).collect())
    }
}

#[async_trait]
impl MetricsClient for DatadogClient {
    async fn query_metrics(&self, window: QueryWindow, query: &str) -> Result<Vec<Series>> {
        let url = self
            .base_url
            .join(QUERY_PATH)
            .map_err(|e| PodsizerError::query(query, format!("invalid path: {e}")))?;

        debug!(
            from = window.start_secs(),
            to = window.end_secs(),
            query = %query,
            "Querying metric"
        );

        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(APP_KEY_HEADER, &self.app_key)
            .query(&[
                ("from", window.start_secs().to_string()),
                ("to", window.end_secs().to_string()),
                ("query", query.to_string()),
            ])
            .send()
            .await
            .map_err(|e| PodsizerError::query(query, format!("failed to send request: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PodsizerError::query(
                query,
                format!("API error ({}): {}", status, body),
            ));
        }

        let payload: QueryResponse = response
            .json()
            .await
            .map_err(|e| PodsizerError::query(query, format!("failed to parse response: {e}")))?;

        let series = Self::decode(query, payload)?;
        for s in &series {
            debug!(
                interval = ?s.interval,
                aggr = ?s.aggr,
                points = s.samples.len(),
                "Received series"
            );
        }
        Ok(series)
    }
}

/// Builder for DatadogClient configuration
pub struct DatadogClientBuilder {
    api_url: String,
    api_key: Option<String>,
    app_key: Option<String>,
    request_timeout: Duration,
    connect_timeout: Duration,
}

impl DatadogClientBuilder {
    pub fn new() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            app_key: None,
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn app_key(mut self, key: impl Into<String>) -> Self {
        self.app_key = Some(key.into());
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn build(self) -> Result<DatadogClient> {
        let api_key = self
            .api_key
            .ok_or_else(|| PodsizerError::config("Datadog API key is required"))?;
        let app_key = self
            .app_key
            .ok_or_else(|| PodsizerError::config("Datadog application key is required"))?;

        let base_url = Url::parse(&self.api_url)
            .map_err(|e| PodsizerError::config(format!("invalid API URL {}: {e}", self.api_url)))?;

        let client = Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .build()
            .map_err(|e| PodsizerError::config(format!("failed to create HTTP client: {e}")))?;

        Ok(DatadogClient {
            client,
            base_url,
            api_key,
            app_key,
        })
    }
}

impl Default for DatadogClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// API response types

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    series: Vec<ApiSeries>,
}

#[derive(Debug, Deserialize)]
struct ApiSeries {
    #[serde(default)]
    metric: String,
    #[serde(default)]
    scope: String,
    #[serde(default)]
    interval: Option<i64>,
    #[serde(default)]
    aggr: Option<String>,
    /// `[timestamp_millis, value]`; value is null for gaps
    #[serde(default)]
    pointlist: Vec<(f64, Option<f64>)>,
}

impl From<ApiSeries> for Series {
    fn from(api: ApiSeries) -> Self {
        let samples = api
            .pointlist
            .into_iter()
            .filter_map(|(ts_millis, value)| {
                value.map(|v| Sample::new((ts_millis / 1000.0) as i64, v))
            })
            .collect();

        Series {
            metric: api.metric,
            scope: api.scope,
            interval: api.interval,
            aggr: api.aggr,
            samples,
        }
    }
}
