//! In-memory edge store
//!
//! Locations live in an insertion-ordered arena (`IndexMap`), so a
//! location's position doubles as its dense index for the algorithms crate.
//! Trips are appended in ingestion order and never removed individually.

use super::edge::{validate_weight, Trip};
use super::node::Location;
use super::types::{EdgeId, NodeIdx};
use crate::error::{AnalyticsError, AnalyticsResult};
use indexmap::IndexMap;
use tracing::debug;
use tripgraph_algorithms::Adjacency;

/// Label used in `NodeNotFound` errors raised against the live store
pub const LIVE_SCOPE: &str = "live graph";

/// In-memory graph storage
///
/// - locations: name -> Location, position = `NodeIdx`
/// - trips: every ingested edge, in ingestion order
/// - neighbors: undirected adjacency, kept in step with `trips`
#[derive(Debug, Default)]
pub struct EdgeStore {
    locations: IndexMap<String, Location>,
    trips: Vec<Trip>,
    neighbors: Vec<Vec<NodeIdx>>,
}

/// Owned, read-only copy of the store taken at one instant
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphSnapshot {
    /// Locations in index order
    pub locations: Vec<Location>,
    /// Trips in ingestion order
    pub trips: Vec<Trip>,
}

impl EdgeStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one directed trip, creating either location on first reference.
    ///
    /// Repeated trips between the same pair accumulate as parallel edges.
    pub fn ingest(&mut self, source: &str, target: &str, weight: f64) -> AnalyticsResult<EdgeId> {
        validate_weight(weight)?;

        let source = self.intern(source);
        let target = self.intern(target);
        let id = EdgeId::new(self.trips.len() as u64);

        self.trips.push(Trip {
            id,
            source,
            target,
            weight,
        });

        // Self-loops never shorten a path
        if source != target {
            self.neighbors[source].push(target);
            self.neighbors[target].push(source);
        }

        Ok(id)
    }

    fn intern(&mut self, name: &str) -> NodeIdx {
        if let Some(idx) = self.locations.get_index_of(name) {
            return idx;
        }
        let (idx, _) = self
            .locations
            .insert_full(name.to_string(), Location::new(name));
        self.neighbors.push(Vec::new());
        debug!("Created location {} at index {}", name, idx);
        idx
    }

    /// Attach caller data to an existing location
    pub fn attach_payload(
        &mut self,
        name: &str,
        payload: serde_json::Value,
    ) -> AnalyticsResult<()> {
        let location = self
            .locations
            .get_mut(name)
            .ok_or_else(|| AnalyticsError::node_not_found(name, LIVE_SCOPE))?;
        location.payload = Some(payload);
        Ok(())
    }

    /// Copy every location and trip for materialization
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            locations: self.locations.values().cloned().collect(),
            trips: self.trips.clone(),
        }
    }

    /// Dense index of a location
    pub fn index_of(&self, name: &str) -> Option<NodeIdx> {
        self.locations.get_index_of(name)
    }

    /// Name of the location at `idx`
    pub fn name_of(&self, idx: NodeIdx) -> Option<&str> {
        self.locations.get_index(idx).map(|(name, _)| name.as_str())
    }

    pub fn location(&self, name: &str) -> Option<&Location> {
        self.locations.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.locations.contains_key(name)
    }

    /// All locations in index order
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }

    /// All trips in ingestion order
    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    /// Get total number of locations
    pub fn node_count(&self) -> usize {
        self.locations.len()
    }

    /// Get total number of trips
    pub fn edge_count(&self) -> usize {
        self.trips.len()
    }

    /// Clear all data from the graph
    pub fn clear(&mut self) {
        self.locations.clear();
        self.trips.clear();
        self.neighbors.clear();
    }
}

impl Adjacency for EdgeStore {
    fn node_count(&self) -> usize {
        self.locations.len()
    }

    fn undirected_neighbors(&self, idx: NodeIdx) -> &[NodeIdx] {
        &self.neighbors[idx]
    }
}

impl GraphSnapshot {
    pub fn node_count(&self) -> usize {
        self.locations.len()
    }

    pub fn edge_count(&self) -> usize {
        self.trips.len()
    }
}
