//! Graph algorithms module
//!
//! Kernels live in the `tripgraph-algorithms` crate and work on dense
//! indices. This module is the adapter layer: it validates parameters,
//! translates location names to indices and back, and applies the result
//! ordering callers rely on.

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::graph::store::LIVE_SCOPE;
use crate::graph::{EdgeStore, NodeIdx};
use crate::projection::{Projection, ProjectionId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use tripgraph_algorithms::{bfs, page_rank_until, Adjacency};

// Re-export kernels
pub use tripgraph_algorithms::{GraphView, PageRankConfig, PageRankRun};

/// One row of a ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedNode {
    pub name: String,
    pub score: f64,
}

/// PageRank output, ordered by score descending then name ascending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankResult {
    /// Projection the scores were computed on
    pub projection: ProjectionId,
    pub entries: Vec<RankedNode>,
    pub iterations: usize,
    /// `false` means `max_iterations` ran out first; the scores are still usable
    pub converged: bool,
}

impl RankResult {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn score_of(&self, name: &str) -> Option<f64> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.score)
    }
}

/// Outcome of a shortest-path query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "path", rename_all = "snake_case")]
pub enum PathOutcome {
    /// Location names from start to end, inclusive
    Found(Vec<String>),
    /// Both endpoints exist but share no component
    NoPath,
}

impl PathOutcome {
    pub fn nodes(&self) -> Option<&[String]> {
        match self {
            PathOutcome::Found(path) => Some(path),
            PathOutcome::NoPath => None,
        }
    }

    /// Number of edges on the path
    pub fn hops(&self) -> Option<usize> {
        self.nodes().map(|p| p.len().saturating_sub(1))
    }
}

/// Check PageRank parameters before any work is done
pub fn validate_rank_config(config: &PageRankConfig) -> AnalyticsResult<()> {
    let d = config.damping_factor;
    if !(d > 0.0 && d < 1.0) {
        return Err(AnalyticsError::InvalidParameter(format!(
            "damping factor must be in (0, 1), got {}",
            d
        )));
    }
    if config.max_iterations == 0 {
        return Err(AnalyticsError::InvalidParameter(
            "max iterations must be at least 1".to_string(),
        ));
    }
    if !config.tolerance.is_finite() || config.tolerance < 0.0 {
        return Err(AnalyticsError::InvalidParameter(format!(
            "tolerance must be finite and non-negative, got {}",
            config.tolerance
        )));
    }
    Ok(())
}

pub(crate) fn validate_limit(limit: usize) -> AnalyticsResult<()> {
    if limit == 0 {
        return Err(AnalyticsError::InvalidParameter(
            "limit must be a positive integer".to_string(),
        ));
    }
    Ok(())
}

/// Computes PageRank over projections
#[derive(Debug, Clone)]
pub struct RankEngine {
    config: PageRankConfig,
}

impl RankEngine {
    pub fn new(config: PageRankConfig) -> AnalyticsResult<Self> {
        validate_rank_config(&config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PageRankConfig {
        &self.config
    }

    /// Top-`limit` locations of `projection`. An empty projection gives an empty result.
    pub fn rank(&self, projection: &Projection, limit: usize) -> AnalyticsResult<RankResult> {
        self.rank_cancellable(projection, limit, &CancellationToken::new())
    }

    /// Like `rank`, checking `token` between iterations.
    pub fn rank_cancellable(
        &self,
        projection: &Projection,
        limit: usize,
        token: &CancellationToken,
    ) -> AnalyticsResult<RankResult> {
        validate_limit(limit)?;

        let run = page_rank_until(projection.view(), &self.config, || token.is_cancelled())
            .map_err(|interrupted| {
                warn!(
                    "PageRank on '{}' cancelled after {} iterations",
                    projection.name(),
                    interrupted.iterations
                );
                AnalyticsError::Cancelled {
                    iterations: interrupted.iterations,
                }
            })?;

        if !run.converged {
            warn!(
                "PageRank on '{}' stopped at {} iterations without reaching tolerance (delta {:.3e})",
                projection.name(),
                run.iterations,
                run.delta
            );
        } else {
            debug!(
                "PageRank on '{}' converged in {} iterations",
                projection.name(),
                run.iterations
            );
        }

        let mut entries: Vec<RankedNode> = run
            .scores
            .iter()
            .enumerate()
            .map(|(idx, &score)| RankedNode {
                name: projection.name_of(idx).to_string(),
                score,
            })
            .collect();
        entries.sort_by(rank_order);
        entries.truncate(limit);

        Ok(RankResult {
            projection: projection.id(),
            entries,
            iterations: run.iterations,
            converged: run.converged,
        })
    }
}

impl Default for RankEngine {
    fn default() -> Self {
        Self {
            config: PageRankConfig::default(),
        }
    }
}

/// Score descending, then name ascending
fn rank_order(a: &RankedNode, b: &RankedNode) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.name.cmp(&b.name))
}

/// A graph whose nodes can be addressed by location name
pub trait NamedGraph: Adjacency {
    fn index_of(&self, name: &str) -> Option<NodeIdx>;
    fn name_at(&self, idx: NodeIdx) -> Option<&str>;
    /// Where lookups happen, for error messages
    fn scope(&self) -> String;
}

impl NamedGraph for Projection {
    fn index_of(&self, name: &str) -> Option<NodeIdx> {
        Projection::index_of(self, name)
    }

    fn name_at(&self, idx: NodeIdx) -> Option<&str> {
        self.locations().get(idx).map(|l| l.name.as_str())
    }

    fn scope(&self) -> String {
        format!("projection '{}'", self.name())
    }
}

impl NamedGraph for EdgeStore {
    fn index_of(&self, name: &str) -> Option<NodeIdx> {
        EdgeStore::index_of(self, name)
    }

    fn name_at(&self, idx: NodeIdx) -> Option<&str> {
        self.name_of(idx)
    }

    fn scope(&self) -> String {
        LIVE_SCOPE.to_string()
    }
}

/// Unweighted, direction-agnostic shortest paths
#[derive(Debug, Clone, Copy, Default)]
pub struct PathEngine;

impl PathEngine {
    pub fn new() -> Self {
        PathEngine
    }

    /// Fewest-hop route between two named locations, trips read both ways.
    pub fn shortest_path<G>(
        &self,
        graph: &G,
        start: &str,
        end: &str,
    ) -> AnalyticsResult<PathOutcome>
    where
        G: NamedGraph + ?Sized,
    {
        let source = graph
            .index_of(start)
            .ok_or_else(|| AnalyticsError::node_not_found(start, graph.scope()))?;
        let target = graph
            .index_of(end)
            .ok_or_else(|| AnalyticsError::node_not_found(end, graph.scope()))?;

        let outcome = match bfs(graph, source, target) {
            Some(indices) => PathOutcome::Found(
                indices
                    .into_iter()
                    .filter_map(|idx| graph.name_at(idx).map(str::to_string))
                    .collect(),
            ),
            None => PathOutcome::NoPath,
        };

        debug!("Shortest path {} -> {}: {:?} hops", start, end, outcome.hops());
        Ok(outcome)
    }
}
