//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use podsizer_lib::{UsageEstimate, WorkloadSelector};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for the estimate
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Four plain lines (default)
    #[default]
    Text,
    /// Table format
    Table,
    /// JSON format
    Json,
}

/// Row for the estimate table
#[derive(Tabled)]
struct EstimateRow {
    #[tabled(rename = "Statistic")]
    statistic: &'static str,
    #[tabled(rename = "Window")]
    window: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// JSON document for the estimate
#[derive(Debug, Serialize)]
struct EstimateReport<'a> {
    helm_release: &'a str,
    kube_container: &'a str,
    #[serde(flatten)]
    estimate: &'a UsageEstimate,
    max_cpu_millicores: f64,
    avg_cpu_millicores: f64,
}

/// Render the estimate in the requested format
pub fn render(
    estimate: &UsageEstimate,
    selector: &WorkloadSelector,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(estimate)),
        OutputFormat::Table => Ok(render_table(estimate, selector)),
        OutputFormat::Json => {
            let report = EstimateReport {
                helm_release: &selector.workload,
                kube_container: &selector.container,
                estimate,
                max_cpu_millicores: estimate.max_cpu_millicores(),
                avg_cpu_millicores: estimate.avg_cpu_millicores(),
            };
            Ok(serde_json::to_string_pretty(&report)?)
        }
    }
}

/// Memory in whole MiB, CPU in millicores with two decimals
pub fn render_text(estimate: &UsageEstimate) -> String {
    format!(
        "Max Memory: {:.0} M in last week\n\
         Avg Memory: {:.0} M in last day\n\
         Max milliCore: {:.2}\n\
         Avg milliCore: {:.2}",
        estimate.max_memory_mib,
        estimate.avg_memory_mib,
        estimate.max_cpu_millicores(),
        estimate.avg_cpu_millicores()
    )
}

fn render_table(estimate: &UsageEstimate, selector: &WorkloadSelector) -> String {
    let rows = vec![
        EstimateRow {
            statistic: "Max Memory",
            window: "7d",
            value: format!("{:.0}Mi", estimate.max_memory_mib),
        },
        EstimateRow {
            statistic: "Avg Memory",
            window: "24h",
            value: format!("{:.0}Mi", estimate.avg_memory_mib),
        },
        EstimateRow {
            statistic: "Max CPU",
            window: "7d",
            value: format!("{:.2}m", estimate.max_cpu_millicores()),
        },
        EstimateRow {
            statistic: "Avg CPU",
            window: "24h",
            value: format!("{:.2}m", estimate.avg_cpu_millicores()),
        },
    ];

    let title = format!("{} / {}", selector.workload, selector.container);
    let table = Table::new(rows).with(Style::rounded()).to_string();
    format!("{}\n{}", title.bold(), table)
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}
