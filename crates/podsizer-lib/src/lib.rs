//! Library behind the Datadog pod sizer
//!
//! This crate provides:
//! - Datadog metrics query client
//! - Daily windowing and usage aggregation (weekly peaks, daily means)
//! - Validated invocation configuration
//! - Error taxonomy shared with the CLI

pub mod aggregator;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;

pub use aggregator::{AggregatorOptions, UsageAggregator, MEMORY_ROUNDING_BIAS_MIB};
pub use config::{ConfigInputs, Credentials, PodsizerConfig};
pub use error::{PodsizerError, Result};
pub use metrics::{DatadogClient, DatadogClientBuilder, MetricQuery, MetricsClient};
pub use models::*;
