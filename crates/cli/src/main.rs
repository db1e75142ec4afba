//! Datadog pod sizer CLI
//!
//! Determines memory and CPU requests/limits for a Helm release's container
//! from the last week of Datadog usage metrics.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use podsizer_lib::{ConfigInputs, PodsizerConfig};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const VERSION: &str = concat!("0.1.", env!("PODSIZER_BUILD"));

/// Datadog pod sizer
#[derive(Parser)]
#[command(name = "podsizer")]
#[command(
    author,
    version = VERSION,
    about = "Determine memory and cpu requests and limits based on DataDog queries",
    long_about = None
)]
pub struct Cli {
    /// DataDog API Key
    #[arg(long, env = "DATADOG_API_KEY", hide_env_values = true)]
    pub datadog_api_key: Option<String>,

    /// DataDog Application Key
    #[arg(long, env = "DATADOG_APP_KEY", hide_env_values = true)]
    pub datadog_app_key: Option<String>,

    /// Helm release
    #[arg(long, short = 'r')]
    pub helm_release: Option<String>,

    /// Kubernetes container name
    #[arg(long, short = 'c')]
    pub kube_container: Option<String>,

    /// DataDog API URL (defaults to the config file value, then https://api.datadoghq.com)
    #[arg(long, env = "DATADOG_API_URL")]
    pub api_url: Option<String>,

    /// Timeout for each metrics query, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Path to a JSON config file (defaults to ~/.config/podsizer/config.json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short, default_value = "text")]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    /// Emit log lines as JSON
    #[arg(long)]
    pub log_json: bool,
}

fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let file_config = match &cli.config {
        Some(path) => config::FileConfig::load_from(path)?,
        None => config::FileConfig::load()?,
    };

    let config = PodsizerConfig::from_inputs(ConfigInputs {
        api_key: cli.datadog_api_key,
        app_key: cli.datadog_app_key,
        release: cli.helm_release,
        container: cli.kube_container,
        api_url: cli.api_url.or(file_config.api_url),
        query_timeout: cli
            .timeout_secs
            .or(file_config.timeout_secs)
            .map(Duration::from_secs),
    })?;
    debug!(?config, "Configuration loaded");

    commands::estimate::run(&config, cli.format).await
}
