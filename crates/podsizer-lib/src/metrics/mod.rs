//! Metrics backend access
//!
//! The aggregator talks to the backend only through [`MetricsClient`], so the
//! Datadog HTTP client can be swapped for an in-memory one in tests.

mod datadog;
mod query;

pub use datadog::{DatadogClient, DatadogClientBuilder};
pub use query::{MetricQuery, CONTAINER_TAG, WORKLOAD_TAG};

use crate::error::Result;
use crate::models::{QueryWindow, Series};

pub use async_trait::async_trait;

/// Trait for metrics query backends
#[async_trait]
pub trait MetricsClient: Send + Sync {
    /// Run `query` over `window` and return every series the backend produced
    async fn query_metrics(&self, window: QueryWindow, query: &str) -> Result<Vec<Series>>;
}
