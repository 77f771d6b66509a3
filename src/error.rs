//! Error types for the analytics core

use thiserror::Error;

/// Errors that can occur while ingesting, projecting or analysing a graph
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// Analytics requested against a name with no materialized snapshot
    #[error("Graph projection '{projection}' does not exist")]
    GraphNotProjected { projection: String },

    /// A start/end location is missing from the graph being searched
    #[error("Node '{name}' not found in {scope}")]
    NodeNotFound { name: String, scope: String },

    /// Non-positive limit, out-of-range damping factor, bad weight, ...
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A rank computation was cancelled between iterations
    #[error("Rank computation cancelled after {iterations} iterations")]
    Cancelled { iterations: usize },

    /// A trip record could not be decoded
    #[error("Malformed trip record on line {line}: {source}")]
    MalformedRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {0}")]
    Config(String),

    /// YAML configuration error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalyticsError {
    pub(crate) fn node_not_found(name: &str, scope: impl Into<String>) -> Self {
        AnalyticsError::NodeNotFound {
            name: name.to_string(),
            scope: scope.into(),
        }
    }
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
