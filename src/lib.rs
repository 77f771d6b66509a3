//! Tripgraph
//!
//! An in-memory analytics core for graphs of locations connected by trips:
//! named, replaceable projections; weighted PageRank; undirected BFS.
//!
//! # Architecture
//!
//! - `graph`: the `EdgeStore` (locations + directed, weighted trips)
//! - `ingest`: JSON-lines trip messages into the store
//! - `projection`: immutable named snapshots with replace-on-exists semantics
//! - `algo`: `RankEngine` and `PathEngine`, adapters over `tripgraph-algorithms`
//! - `facade`: `QueryFacade`, the `rank` / `shortest_path` surface
//! - `config`: YAML-backed `EngineConfig`
//!
//! ## Example Usage
//!
//! ```rust
//! use tripgraph::{EngineConfig, PathOutcome, QueryFacade};
//!
//! let facade = QueryFacade::new(EngineConfig::default()).unwrap();
//! facade.ingest("A", "B", 1.0).unwrap();
//! facade.ingest("B", "C", 1.0).unwrap();
//! facade.ingest("C", "A", 1.0).unwrap();
//!
//! let ranking = facade.rank("trips", 3).unwrap();
//! assert_eq!(ranking.entries[0].name, "A");
//!
//! let path = facade.shortest_path("A", "C").unwrap();
//! assert_eq!(path, PathOutcome::Found(vec!["A".into(), "C".into()]));
//! ```

#![warn(clippy::all)]

pub mod algo;
pub mod config;
pub mod error;
pub mod facade;
pub mod graph;
pub mod ingest;
pub mod projection;

// Re-export main types for convenience
pub use algo::{
    NamedGraph, PageRankConfig, PathEngine, PathOutcome, RankEngine, RankResult, RankedNode,
};
pub use config::EngineConfig;
pub use error::{AnalyticsError, AnalyticsResult};
pub use facade::{GraphStats, QueryFacade};
pub use graph::{EdgeId, EdgeStore, GraphSnapshot, Location, NodeIdx, Trip};
pub use ingest::{IngestStats, LocationKey, TripRecord};
pub use projection::{Projection, ProjectionId, ProjectionSummary, Projector};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
