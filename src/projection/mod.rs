//! Named graph projections
//!
//! A projection is an immutable, CSR-backed copy of the edge store bound to
//! a name. Re-projecting a name swaps in a fresh `Arc<Projection>`; anyone
//! still holding the previous one keeps reading the old, unchanged data.
//!
//! Lock order is per-name lock, then store read lock, then catalog lock.
//! `EdgeStore::ingest` only ever takes the store write lock.

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::graph::{EdgeStore, GraphSnapshot, Location, NodeIdx};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};
use tripgraph_algorithms::{Adjacency, GraphView};

/// Identifier of one materialization; every `project` call gets a new one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct ProjectionId(pub u64);

impl ProjectionId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProjectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProjectionId({})", self.0)
    }
}

/// Immutable analytics input
#[derive(Debug)]
pub struct Projection {
    id: ProjectionId,
    name: String,
    created_at: DateTime<Utc>,
    locations: Vec<Location>,
    name_index: HashMap<String, NodeIdx>,
    view: GraphView,
}

/// Catalog entry as reported by `Projector::list`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub name: String,
    pub id: ProjectionId,
    pub node_count: usize,
    pub edge_count: usize,
    pub created_at: DateTime<Utc>,
}

impl Projection {
    /// Build the CSR view for a snapshot
    pub fn materialize(id: ProjectionId, name: impl Into<String>, snapshot: GraphSnapshot) -> Self {
        let GraphSnapshot { locations, trips } = snapshot;

        let name_index = locations
            .iter()
            .enumerate()
            .map(|(idx, location)| (location.name.clone(), idx))
            .collect();

        let view = GraphView::from_edges(
            locations.len(),
            trips.iter().map(|t| (t.source, t.target, t.weight)),
        );

        Projection {
            id,
            name: name.into(),
            created_at: Utc::now(),
            locations,
            name_index,
            view,
        }
    }

    pub fn id(&self) -> ProjectionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn view(&self) -> &GraphView {
        &self.view
    }

    pub fn node_count(&self) -> usize {
        self.view.node_count
    }

    pub fn edge_count(&self) -> usize {
        self.view.edge_count
    }

    pub fn index_of(&self, name: &str) -> Option<NodeIdx> {
        self.name_index.get(name).copied()
    }

    /// Name of the location at `idx`; `idx` must come from this projection
    pub fn name_of(&self, idx: NodeIdx) -> &str {
        &self.locations[idx].name
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn summary(&self) -> ProjectionSummary {
        ProjectionSummary {
            name: self.name.clone(),
            id: self.id,
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            created_at: self.created_at,
        }
    }
}

impl Adjacency for Projection {
    fn node_count(&self) -> usize {
        self.view.node_count
    }

    fn undirected_neighbors(&self, idx: NodeIdx) -> &[NodeIdx] {
        self.view.undirected_neighbors(idx)
    }
}

/// Materializes and tracks named projections of one edge store
pub struct Projector {
    store: Arc<RwLock<EdgeStore>>,
    catalog: RwLock<HashMap<String, Arc<Projection>>>,
    name_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    next_id: AtomicU64,
}

impl Projector {
    pub fn new(store: Arc<RwLock<EdgeStore>>) -> Self {
        Self {
            store,
            catalog: RwLock::new(HashMap::new()),
            name_locks: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn name_lock(&self, name: &str) -> Arc<Mutex<()>> {
        let mut locks = self.name_locks.lock();
        Arc::clone(locks.entry(name.to_string()).or_default())
    }

    /// Replace (or create) the projection called `name` with the current store contents.
    pub fn project(&self, name: &str) -> AnalyticsResult<ProjectionId> {
        self.replace(name).map(|p| p.id())
    }

    /// Same as `project`, handing back the snapshot that was just bound.
    pub fn replace(&self, name: &str) -> AnalyticsResult<Arc<Projection>> {
        validate_name(name)?;

        let lock = self.name_lock(name);
        let _guard = lock.lock();

        let snapshot = self.store.read().snapshot();
        let id = ProjectionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let projection = Arc::new(Projection::materialize(id, name, snapshot));

        let previous = self
            .catalog
            .write()
            .insert(name.to_string(), Arc::clone(&projection));

        match previous {
            Some(old) => info!(
                "Replaced projection '{}' ({} -> {}), {} nodes, {} edges",
                name,
                old.id(),
                id,
                projection.node_count(),
                projection.edge_count()
            ),
            None => info!(
                "Created projection '{}' ({}), {} nodes, {} edges",
                name,
                id,
                projection.node_count(),
                projection.edge_count()
            ),
        }

        Ok(projection)
    }

    /// Look up a live projection
    pub fn get(&self, name: &str) -> AnalyticsResult<Arc<Projection>> {
        self.catalog
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| AnalyticsError::GraphNotProjected {
                projection: name.to_string(),
            })
    }

    pub fn exists(&self, name: &str) -> bool {
        self.catalog.read().contains_key(name)
    }

    /// Discard a projection. Returns whether one was bound; absent names are not an error.
    pub fn remove(&self, name: &str) -> bool {
        let removed = {
            let lock = self.name_lock(name);
            let _guard = lock.lock();
            self.catalog.write().remove(name).is_some()
        };
        self.release_name_lock(name);

        if removed {
            info!("Dropped projection '{}'", name);
        } else {
            debug!("Drop of unknown projection '{}' ignored", name);
        }
        removed
    }

    /// Forget the per-name lock unless another call still holds it
    fn release_name_lock(&self, name: &str) {
        let mut locks = self.name_locks.lock();
        if locks.get(name).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(name);
        }
    }

    /// Summaries of all live projections, sorted by name
    pub fn list(&self) -> Vec<ProjectionSummary> {
        let mut summaries: Vec<ProjectionSummary> =
            self.catalog.read().values().map(|p| p.summary()).collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }
}

fn validate_name(name: &str) -> AnalyticsResult<()> {
    if name.trim().is_empty() {
        return Err(AnalyticsError::InvalidParameter(
            "projection name must not be empty".to_string(),
        ));
    }
    Ok(())
}
