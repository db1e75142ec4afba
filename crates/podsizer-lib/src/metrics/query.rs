//! Datadog metric query strings

use crate::models::{ResourceMetric, SpaceAggregator, WorkloadSelector};
use std::fmt;

/// Tag carrying the Helm release
pub const WORKLOAD_TAG: &str = "helm_release";

/// Tag carrying the container name
pub const CONTAINER_TAG: &str = "kube_container_name";

/// A metric query scoped to one workload container
///
/// Renders as `<aggr>:<metric>{helm_release:<w>,kube_container_name:<c>}`.
#[derive(Debug, Clone, Copy)]
pub struct MetricQuery<'a> {
    pub aggregator: SpaceAggregator,
    pub metric: ResourceMetric,
    pub selector: &'a WorkloadSelector,
}

impl<'a> MetricQuery<'a> {
    pub fn new(
        aggregator: SpaceAggregator,
        metric: ResourceMetric,
        selector: &'a WorkloadSelector,
    ) -> Self {
        Self {
            aggregator,
            metric,
            selector,
        }
    }
}

impl fmt::Display for MetricQuery<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}{{{}:{},{}:{}}}",
            self.aggregator.as_str(),
            self.metric.metric_name(),
            WORKLOAD_TAG,
            self.selector.workload,
            CONTAINER_TAG,
            self.selector.container
        )
    }
}
