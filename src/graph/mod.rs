//! Core graph implementation
//!
//! This module implements the location/trip data model with:
//! - Locations identified by a unique name, created on first reference
//! - Directed, weighted trips between locations
//! - Multiple trips between the same locations, kept as parallel edges
//! - In-memory storage with an insertion-ordered name index

pub mod edge;
pub mod node;
pub mod store;
pub mod types;

// Re-export main types
pub use edge::Trip;
pub use node::Location;
pub use store::{EdgeStore, GraphSnapshot};
pub use types::{EdgeId, NodeIdx};
