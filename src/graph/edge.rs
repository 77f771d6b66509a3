//! Trip edges
//!
//! A trip is a directed edge with a finite, non-negative weight. Direction
//! matters for ranking; path search reads every trip both ways.

use super::types::{EdgeId, NodeIdx};
use crate::error::{AnalyticsError, AnalyticsResult};
use serde::{Deserialize, Serialize};

/// A directed, weighted edge between two locations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    /// Unique identifier, increasing in ingestion order
    pub id: EdgeId,

    /// Source location (trip goes FROM here)
    pub source: NodeIdx,

    /// Target location
    pub target: NodeIdx,

    /// Duration, distance or count; never negative
    pub weight: f64,
}

impl Trip {
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Reject weights PageRank cannot distribute.
pub fn validate_weight(weight: f64) -> AnalyticsResult<()> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(AnalyticsError::InvalidParameter(format!(
            "trip weight must be finite and non-negative, got {}",
            weight
        )))
    }
}
