//! Engine configuration
//!
//! Defaults match the usual PageRank settings; a YAML file can override any
//! subset of them:
//!
//! ```yaml
//! pagerank:
//!   damping_factor: 0.85
//!   max_iterations: 20
//!   tolerance: 1.0e-7
//! default_limit: 10
//! default_projection: trips
//! ```

use crate::algo::{validate_rank_config, PageRankConfig};
use crate::error::{AnalyticsError, AnalyticsResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Missing keys fall back to `PageRankConfig::default()`
    pub pagerank: PageRankConfig,
    /// Number of ranked locations returned when the caller gives no limit
    pub default_limit: usize,
    /// Projection name used when the caller gives none
    pub default_projection: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pagerank: PageRankConfig::default(),
            default_limit: 10,
            default_projection: "trips".to_string(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> AnalyticsResult<Self> {
        let config: EngineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> AnalyticsResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        info!("Loaded engine configuration from {:?}", path);
        Ok(config)
    }

    pub fn validate(&self) -> AnalyticsResult<()> {
        validate_rank_config(&self.pagerank_config())
            .map_err(|e| AnalyticsError::Config(e.to_string()))?;
        if self.default_limit == 0 {
            return Err(AnalyticsError::Config(
                "default_limit must be a positive integer".to_string(),
            ));
        }
        if self.default_projection.trim().is_empty() {
            return Err(AnalyticsError::Config(
                "default_projection must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn pagerank_config(&self) -> PageRankConfig {
        self.pagerank
    }
}
