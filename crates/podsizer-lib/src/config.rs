//! Invocation configuration
//!
//! Built once at the CLI boundary and passed by reference afterwards; nothing
//! mutates it after validation.

use crate::error::{PodsizerError, Result};
use crate::models::WorkloadSelector;
use std::fmt;
use std::time::Duration;

/// Default Datadog API endpoint
pub const DEFAULT_API_URL: &str = "https://api.datadoghq.com";

/// Default per-query timeout
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Datadog API and application keys
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub app_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("app_key", &"<redacted>")
            .finish()
    }
}

/// Validated configuration for one run
#[derive(Debug, Clone)]
pub struct PodsizerConfig {
    pub credentials: Credentials,
    pub selector: WorkloadSelector,
    pub api_url: String,
    pub query_timeout: Duration,
}

/// Raw, possibly incomplete inputs
#[derive(Debug, Clone, Default)]
pub struct ConfigInputs {
    pub api_key: Option<String>,
    pub app_key: Option<String>,
    pub release: Option<String>,
    pub container: Option<String>,
    pub api_url: Option<String>,
    pub query_timeout: Option<Duration>,
}

impl PodsizerConfig {
    /// Validate raw inputs; empty strings count as missing
    pub fn from_inputs(inputs: ConfigInputs) -> Result<Self> {
        let release = non_empty(inputs.release);
        let container = non_empty(inputs.container);
        let (Some(release), Some(container)) = (release, container) else {
            return Err(PodsizerError::config(
                "Helm Release and Kube Container are mandatory parameters",
            ));
        };

        let api_key = non_empty(inputs.api_key)
            .ok_or_else(|| PodsizerError::config("Datadog API key is required"))?;
        let app_key = non_empty(inputs.app_key)
            .ok_or_else(|| PodsizerError::config("Datadog application key is required"))?;

        let api_url = non_empty(inputs.api_url).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        url::Url::parse(&api_url)
            .map_err(|e| PodsizerError::config(format!("invalid API URL {api_url}: {e}")))?;

        let query_timeout = inputs.query_timeout.unwrap_or(DEFAULT_QUERY_TIMEOUT);
        if query_timeout.is_zero() {
            return Err(PodsizerError::config("query timeout must be greater than zero"));
        }

        Ok(Self {
            credentials: Credentials { api_key, app_key },
            selector: WorkloadSelector::new(release, container),
            api_url,
            query_timeout,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
