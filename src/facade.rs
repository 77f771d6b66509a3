//! QueryFacade: the outward surface of the analytics core
//!
//! Owns the edge store, the projection catalog and both engines. `rank`
//! always re-projects before computing, so its scores reflect the store
//! as of the call; `shortest_path` reads the live store under one read lock.

use crate::algo::{validate_limit, PathEngine, PathOutcome, RankEngine, RankResult};
use crate::config::EngineConfig;
use crate::error::AnalyticsResult;
use crate::graph::{EdgeId, EdgeStore};
use crate::ingest::{ingest_records, read_jsonl, IngestStats, TripRecord};
use crate::projection::Projector;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Size of the live graph and the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub projections: usize,
}

pub struct QueryFacade {
    store: Arc<RwLock<EdgeStore>>,
    projector: Projector,
    ranker: RankEngine,
    paths: PathEngine,
    config: EngineConfig,
}

impl QueryFacade {
    /// Create a facade over a fresh, empty store
    pub fn new(config: EngineConfig) -> AnalyticsResult<Self> {
        Self::with_store(Arc::new(RwLock::new(EdgeStore::new())), config)
    }

    /// Create a facade over an existing (possibly shared) store
    pub fn with_store(
        store: Arc<RwLock<EdgeStore>>,
        config: EngineConfig,
    ) -> AnalyticsResult<Self> {
        config.validate()?;
        let ranker = RankEngine::new(config.pagerank_config())?;
        Ok(Self {
            projector: Projector::new(Arc::clone(&store)),
            store,
            ranker,
            paths: PathEngine::new(),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<RwLock<EdgeStore>> {
        &self.store
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    /// Insert one trip into the live store
    pub fn ingest(&self, source: &str, target: &str, weight: f64) -> AnalyticsResult<EdgeId> {
        self.store.write().ingest(source, target, weight)
    }

    /// Insert a batch of trips under a single write lock
    pub fn ingest_records(&self, records: &[TripRecord]) -> AnalyticsResult<IngestStats> {
        ingest_records(&mut self.store.write(), records)
    }

    /// Decode JSON-lines trip messages and ingest them as one batch
    pub fn load_trips<R: BufRead>(&self, reader: R) -> AnalyticsResult<IngestStats> {
        let records = read_jsonl(reader)?;
        self.ingest_records(&records)
    }

    /// Re-project `projection_name` from the live store, then rank it.
    pub fn rank(&self, projection_name: &str, limit: usize) -> AnalyticsResult<RankResult> {
        self.rank_cancellable(projection_name, limit, &CancellationToken::new())
    }

    /// `rank` with the configured default projection and limit
    pub fn rank_default(&self) -> AnalyticsResult<RankResult> {
        self.rank(&self.config.default_projection, self.config.default_limit)
    }

    /// `rank`, checking `token` between PageRank iterations
    pub fn rank_cancellable(
        &self,
        projection_name: &str,
        limit: usize,
        token: &CancellationToken,
    ) -> AnalyticsResult<RankResult> {
        validate_limit(limit)?;
        let projection = self.projector.replace(projection_name)?;
        debug!("Ranking projection '{}' ({})", projection_name, projection.id());
        self.ranker.rank_cancellable(&projection, limit, token)
    }

    /// Rank an already materialized projection without refreshing it
    pub fn rank_projection(
        &self,
        projection_name: &str,
        limit: usize,
    ) -> AnalyticsResult<RankResult> {
        let projection = self.projector.get(projection_name)?;
        self.ranker.rank(&projection, limit)
    }

    /// Fewest-hop route over the live store
    pub fn shortest_path(&self, start: &str, end: &str) -> AnalyticsResult<PathOutcome> {
        let store = self.store.read();
        self.paths.shortest_path(&*store, start, end)
    }

    /// Fewest-hop route inside a named projection
    pub fn shortest_path_in(
        &self,
        projection_name: &str,
        start: &str,
        end: &str,
    ) -> AnalyticsResult<PathOutcome> {
        let projection = self.projector.get(projection_name)?;
        self.paths.shortest_path(&*projection, start, end)
    }

    pub fn stats(&self) -> GraphStats {
        let store = self.store.read();
        GraphStats {
            nodes: store.node_count(),
            edges: store.edge_count(),
            projections: self.projector.list().len(),
        }
    }
}
