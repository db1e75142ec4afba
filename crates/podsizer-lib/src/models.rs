//! Core data models for usage estimation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bytes in one mebibyte
pub const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Nanocores in one millicore
pub const NANOCORES_PER_MILLICORE: f64 = 1_000_000.0;

/// A single usage point in source units (bytes or nanocores)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp_secs: i64,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp_secs: i64, value: f64) -> Self {
        Self {
            timestamp_secs,
            value,
        }
    }
}

/// One time series returned by a metrics query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub metric: String,
    pub scope: String,
    /// Rollup interval in seconds, if the backend reported one
    pub interval: Option<i64>,
    /// Space aggregation the backend applied, if reported
    pub aggr: Option<String>,
    pub samples: Vec<Sample>,
}

impl Series {
    /// Build a bare series from samples; metadata left empty
    pub fn from_samples(samples: Vec<Sample>) -> Self {
        Self {
            samples,
            ..Self::default()
        }
    }
}

/// Time range of a single query, exactly one day wide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl QueryWindow {
    pub fn start_secs(&self) -> i64 {
        self.start.timestamp()
    }

    pub fn end_secs(&self) -> i64 {
        self.end.timestamp()
    }
}

impl fmt::Display for QueryWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

/// Kubernetes usage metrics the sizer reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceMetric {
    Memory,
    Cpu,
}

impl ResourceMetric {
    pub fn metric_name(self) -> &'static str {
        match self {
            ResourceMetric::Memory => "kubernetes.memory.usage",
            ResourceMetric::Cpu => "kubernetes.cpu.usage.total",
        }
    }
}

/// Space aggregator prefix of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpaceAggregator {
    Max,
    Avg,
}

impl SpaceAggregator {
    pub fn as_str(self) -> &'static str {
        match self {
            SpaceAggregator::Max => "max",
            SpaceAggregator::Avg => "avg",
        }
    }
}

/// Workload and container the metrics are filtered on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadSelector {
    /// Helm release name
    pub workload: String,
    /// Kubernetes container name
    pub container: String,
}

impl WorkloadSelector {
    pub fn new(workload: impl Into<String>, container: impl Into<String>) -> Self {
        Self {
            workload: workload.into(),
            container: container.into(),
        }
    }
}

/// The four statistics one invocation produces
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsageEstimate {
    pub max_memory_mib: f64,
    pub avg_memory_mib: f64,
    pub max_cpu_nanocores: f64,
    pub avg_cpu_nanocores: f64,
}

impl UsageEstimate {
    pub fn max_cpu_millicores(&self) -> f64 {
        nanocores_to_millicores(self.max_cpu_nanocores)
    }

    pub fn avg_cpu_millicores(&self) -> f64 {
        nanocores_to_millicores(self.avg_cpu_nanocores)
    }
}

pub fn bytes_to_mib(bytes: f64) -> f64 {
    bytes / BYTES_PER_MIB
}

pub fn nanocores_to_millicores(nanocores: f64) -> f64 {
    nanocores / NANOCORES_PER_MILLICORE
}
