//! Usage estimate command

use anyhow::Result;
use podsizer_lib::{DatadogClient, PodsizerConfig, UsageAggregator};
use std::sync::Arc;
use tracing::info;

use crate::output::{print_error, render, OutputFormat};

/// Query Datadog for the configured workload and print the four statistics
///
/// Nothing is printed to stdout unless all four succeed.
pub async fn run(config: &PodsizerConfig, format: OutputFormat) -> Result<()> {
    let client = DatadogClient::from_config(config)?;
    let aggregator = UsageAggregator::from_config(Arc::new(client), config);

    info!(
        release = %config.selector.workload,
        container = %config.selector.container,
        "Estimating resource usage"
    );

    let estimate = match aggregator.estimate().await {
        Ok(estimate) => estimate,
        Err(e) if e.is_no_data() => {
            print_error("Datadog returned an empty series; check the release and container names");
            return Err(anyhow::Error::new(e).context("No usage data"));
        }
        Err(e) => return Err(anyhow::Error::new(e).context("Failed to estimate resource usage")),
    };

    println!("{}", render(&estimate, &config.selector, format)?);
    Ok(())
}
