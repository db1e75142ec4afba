//! Error taxonomy for usage estimation

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the pod sizer
#[derive(Debug, Error)]
pub enum PodsizerError {
    /// Required input missing or invalid; raised before any query is issued
    #[error("configuration error: {0}")]
    Config(String),

    /// The metrics backend rejected or failed the request
    #[error("query `{query}` failed: {message}")]
    Query { query: String, message: String },

    /// No response within the per-query timeout
    #[error("query `{query}` timed out after {}s", timeout.as_secs())]
    Timeout { query: String, timeout: Duration },

    /// A series came back without any samples
    #[error("query `{query}` returned a series with no samples")]
    NoData { query: String },
}

impl PodsizerError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn query(query: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Query {
            query: query.into(),
            message: message.to_string(),
        }
    }

    /// Whether this error means the backend had nothing to report
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }
}

pub type Result<T> = std::result::Result<T, PodsizerError>;
