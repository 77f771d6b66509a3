//! Storage-independent graph kernels.
//!
//! Every kernel works on dense node indices (`0..node_count`). Callers own
//! the mapping between their identifiers and those indices.

pub mod common;
pub mod pagerank;
pub mod pathfinding;

pub use common::{Adjacency, GraphView, NodeIdx};
pub use pagerank::{page_rank, page_rank_until, Interrupted, PageRankConfig, PageRankRun};
pub use pathfinding::bfs;
