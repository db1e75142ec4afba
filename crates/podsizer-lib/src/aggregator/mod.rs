//! Usage aggregation over Datadog time series
//!
//! Four statistics per workload container:
//! - peak memory over the last week (MiB, display bias applied)
//! - mean memory over the last day (MiB)
//! - peak CPU over the last week (nanocores)
//! - mean CPU over the last day (nanocores)
//!
//! Weekly peaks are computed as seven independent one-day queries reduced with
//! `max`. Queries run one after another and the first failure aborts the
//! statistic; no partial result is ever returned.

mod window;


pub use window::{daily_windows, trailing_day, WINDOW_SECS};

use crate::config::{PodsizerConfig, DEFAULT_QUERY_TIMEOUT};
use crate::error::{PodsizerError, Result};
use crate::metrics::{MetricQuery, MetricsClient};
use crate::models::{
    bytes_to_mib, QueryWindow, ResourceMetric, Series, SpaceAggregator, UsageEstimate,
    WorkloadSelector,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Added to every converted memory sample before taking the peak.
///
/// Datadog rounds memory up when displaying MiB; the bias keeps the reported
/// peak in line with what its UI shows for the same series.
pub const MEMORY_ROUNDING_BIAS_MIB: f64 = 0.44;

/// Number of one-day windows in the weekly peak
pub const WEEK_DAYS: u32 = 7;

/// Options for the aggregator
#[derive(Debug, Clone)]
pub struct AggregatorOptions {
    /// Upper bound on each backend call
    pub query_timeout: Duration,
    /// Fixed evaluation instant; `None` uses the wall clock
    pub now: Option<DateTime<Utc>>,
}

impl Default for AggregatorOptions {
    fn default() -> Self {
        Self {
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            now: None,
        }
    }
}

/// Computes usage statistics for one workload container
pub struct UsageAggregator {
    client: Arc<dyn MetricsClient>,
    selector: WorkloadSelector,
    options: AggregatorOptions,
}

impl UsageAggregator {
    pub fn new(client: Arc<dyn MetricsClient>, selector: WorkloadSelector) -> Self {
        Self::with_options(client, selector, AggregatorOptions::default())
    }

    pub fn with_options(
        client: Arc<dyn MetricsClient>,
        selector: WorkloadSelector,
        options: AggregatorOptions,
    ) -> Self {
        Self {
            client,
            selector,
            options,
        }
    }

    /// Create an aggregator for the workload and timeout in `config`
    pub fn from_config(client: Arc<dyn MetricsClient>, config: &PodsizerConfig) -> Self {
        Self::with_options(
            client,
            config.selector.clone(),
            AggregatorOptions {
                query_timeout: config.query_timeout,
                now: None,
            },
        )
    }

    pub fn selector(&self) -> &WorkloadSelector {
        &self.selector
    }

    fn now(&self) -> DateTime<Utc> {
        self.options.now.unwrap_or_else(Utc::now)
    }

    /// Peak memory over the last seven days, in MiB including the display bias
    pub async fn max_weekly_memory(&self) -> Result<f64> {
        let peak = self
            .weekly_peak(ResourceMetric::Memory, memory_mib_with_bias)
            .await?;
        info!(max_memory_mib = peak, "Computed weekly memory peak");
        Ok(peak)
    }

    /// Mean memory over the last 24 hours, in MiB
    pub async fn avg_daily_memory(&self) -> Result<f64> {
        let mean = self.daily_mean(ResourceMetric::Memory).await?;
        let mib = bytes_to_mib(mean);
        info!(avg_memory_mib = mib, "Computed daily memory average");
        Ok(mib)
    }

    /// Peak CPU over the last seven days, in raw nanocores
    pub async fn max_weekly_cpu(&self) -> Result<f64> {
        let peak = self.weekly_peak(ResourceMetric::Cpu, |v| v).await?;
        info!(max_cpu_nanocores = peak, "Computed weekly CPU peak");
        Ok(peak)
    }

    /// Mean CPU over the last 24 hours, in raw nanocores
    pub async fn avg_daily_cpu(&self) -> Result<f64> {
        let mean = self.daily_mean(ResourceMetric::Cpu).await?;
        info!(avg_cpu_nanocores = mean, "Computed daily CPU average");
        Ok(mean)
    }

    /// All four statistics, in order; the first failure aborts the rest
    pub async fn estimate(&self) -> Result<UsageEstimate> {
        Ok(UsageEstimate {
            max_memory_mib: self.max_weekly_memory().await?,
            avg_memory_mib: self.avg_daily_memory().await?,
            max_cpu_nanocores: self.max_weekly_cpu().await?,
            avg_cpu_nanocores: self.avg_daily_cpu().await?,
        })
    }

    async fn fetch(&self, window: QueryWindow, query: &str) -> Result<Vec<Series>> {
        let timeout = self.options.query_timeout;
        tokio::time::timeout(timeout, self.client.query_metrics(window, query))
            .await
            .map_err(|_| PodsizerError::Timeout {
                query: query.to_string(),
                timeout,
            })?
    }

    async fn weekly_peak(&self, metric: ResourceMetric, convert: fn(f64) -> f64) -> Result<f64> {
        let query = MetricQuery::new(SpaceAggregator::Max, metric, &self.selector).to_string();
        let mut peak = 0.0;

        for (day, window) in daily_windows(self.now(), WEEK_DAYS).into_iter().enumerate() {
            let series = self.fetch(window, &query).await?;
            let day_max = peak_value(&series, convert);
            debug!(day, %window, day_max, "Day peak");
            peak = max_of(peak, day_max);
        }

        Ok(peak)
    }

    /// Mean of the first series returned for the trailing day, in source units
    async fn daily_mean(&self, metric: ResourceMetric) -> Result<f64> {
        let query = MetricQuery::new(SpaceAggregator::Avg, metric, &self.selector).to_string();
        let window = trailing_day(self.now());
        let series = self.fetch(window, &query).await?;

        let Some(first) = series.first() else {
            debug!(query = %query, "No series returned, reporting zero");
            return Ok(0.0);
        };
        if series.len() > 1 {
            warn!(
                query = %query,
                ignored = series.len() - 1,
                "Multiple series returned, averaging the first only"
            );
        }

        mean(first).ok_or(PodsizerError::NoData { query })
    }
}

/// Memory bytes to MiB plus the display bias
pub fn memory_mib_with_bias(bytes: f64) -> f64 {
    bytes_to_mib(bytes) + MEMORY_ROUNDING_BIAS_MIB
}

/// Largest converted sample across all series; 0 when there are none
pub fn peak_value(series: &[Series], convert: impl Fn(f64) -> f64) -> f64 {
    series
        .iter()
        .flat_map(|s| s.samples.iter())
        .map(|sample| convert(sample.value))
        .fold(0.0, max_of)
}

/// Arithmetic mean of a series' samples; `None` when it has none
pub fn mean(series: &Series) -> Option<f64> {
    if series.samples.is_empty() {
        return None;
    }
    let total: f64 = series.samples.iter().map(|s| s.value).sum();
    Some(total / series.samples.len() as f64)
}

fn max_of(current: f64, candidate: f64) -> f64 {
    if candidate > current {
        candidate
    } else {
        current
    }
}
