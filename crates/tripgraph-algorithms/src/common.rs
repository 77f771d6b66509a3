//! Shared utilities for graph algorithms
//!
//! Provides a read-only, optimized view of the graph topology for algorithm execution.

/// Dense node index (0..N)
pub type NodeIdx = usize;

/// Anything that can enumerate the undirected neighbours of a dense node index.
///
/// Neighbour order is part of the contract: traversal kernels visit
/// neighbours in exactly the order returned here, which makes their
/// output reproducible for identical inputs.
pub trait Adjacency {
    /// Number of nodes; valid indices are `0..node_count()`.
    fn node_count(&self) -> usize;

    /// Nodes sharing at least one edge with `idx`, in either direction.
    fn undirected_neighbors(&self, idx: NodeIdx) -> &[NodeIdx];
}

/// A dense, integer-indexed view of the graph topology using Compressed Sparse Row (CSR) format.
///
/// Built once from an ordered edge list and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct GraphView {
    /// Number of nodes
    pub node_count: usize,

    /// Outgoing edges CSR structure
    /// Offsets into `out_targets`. Size = node_count + 1
    pub out_offsets: Vec<usize>,
    /// Contiguous array of target node indices
    pub out_targets: Vec<NodeIdx>,
    /// Edge weights: aligned with `out_targets`
    pub out_weights: Vec<f64>,
    /// Sum of outgoing weights per node; infinite once it passes `f64::MAX`
    pub out_weight_totals: Vec<f64>,
    /// Share of a node's rank each edge carries: `w / total`, aligned with
    /// `out_targets`. All zero for a dangling node.
    pub out_fractions: Vec<f64>,

    /// Undirected adjacency CSR structure (each edge seen from both endpoints)
    pub und_offsets: Vec<usize>,
    pub und_targets: Vec<NodeIdx>,

    /// Number of directed edges, parallel edges counted separately
    pub edge_count: usize,
}

impl GraphView {
    /// Build a view from `(source, target, weight)` triples.
    ///
    /// Edge order is preserved inside every adjacency row. All indices must
    /// be below `node_count`.
    pub fn from_edges<I>(node_count: usize, edges: I) -> Self
    where
        I: IntoIterator<Item = (NodeIdx, NodeIdx, f64)>,
    {
        let edges: Vec<(NodeIdx, NodeIdx, f64)> = edges.into_iter().collect();

        let mut out_counts = vec![0usize; node_count];
        let mut und_counts = vec![0usize; node_count];
        for &(u, v, _) in &edges {
            out_counts[u] += 1;
            if u != v {
                und_counts[u] += 1;
                und_counts[v] += 1;
            }
        }

        let out_offsets = prefix_offsets(&out_counts);
        let und_offsets = prefix_offsets(&und_counts);

        let mut out_targets = vec![0; edges.len()];
        let mut out_weights = vec![0.0; edges.len()];
        let mut out_weight_totals = vec![0.0; node_count];
        let mut und_targets = vec![0; und_offsets[node_count]];

        let mut out_cursor = out_offsets[..node_count].to_vec();
        let mut und_cursor = und_offsets[..node_count].to_vec();

        for &(u, v, w) in &edges {
            out_targets[out_cursor[u]] = v;
            out_weights[out_cursor[u]] = w;
            out_cursor[u] += 1;
            out_weight_totals[u] += w;

            // Self-loops never shorten a path
            if u != v {
                und_targets[und_cursor[u]] = v;
                und_cursor[u] += 1;
                und_targets[und_cursor[v]] = u;
                und_cursor[v] += 1;
            }
        }

        let mut out_fractions = vec![0.0; edges.len()];
        for u in 0..node_count {
            let row = out_offsets[u]..out_offsets[u + 1];
            transition_fractions(&out_weights[row.clone()], &mut out_fractions[row]);
        }

        GraphView {
            node_count,
            out_offsets,
            out_targets,
            out_weights,
            out_weight_totals,
            out_fractions,
            und_offsets,
            und_targets,
            edge_count: edges.len(),
        }
    }

    /// Get the out-degree of a node (by index)
    pub fn out_degree(&self, idx: NodeIdx) -> usize {
        self.out_offsets[idx + 1] - self.out_offsets[idx]
    }

    /// Get outgoing neighbors (successors) of a node
    pub fn successors(&self, idx: NodeIdx) -> &[NodeIdx] {
        &self.out_targets[self.out_offsets[idx]..self.out_offsets[idx + 1]]
    }

    /// Get weights for outgoing edges of a node, aligned with `successors`
    pub fn weights(&self, idx: NodeIdx) -> &[f64] {
        &self.out_weights[self.out_offsets[idx]..self.out_offsets[idx + 1]]
    }

    /// Total outgoing weight
    pub fn out_weight(&self, idx: NodeIdx) -> f64 {
        self.out_weight_totals[idx]
    }

    /// Transition fractions of the outgoing edges, aligned with `successors`
    pub fn fractions(&self, idx: NodeIdx) -> &[f64] {
        &self.out_fractions[self.out_offsets[idx]..self.out_offsets[idx + 1]]
    }

    /// No outgoing edge carries positive weight
    pub fn is_dangling(&self, idx: NodeIdx) -> bool {
        self.fractions(idx).iter().all(|&f| f <= 0.0)
    }
}

impl Adjacency for GraphView {
    fn node_count(&self) -> usize {
        self.node_count
    }

    fn undirected_neighbors(&self, idx: NodeIdx) -> &[NodeIdx] {
        &self.und_targets[self.und_offsets[idx]..self.und_offsets[idx + 1]]
    }
}

/// Normalize one adjacency row to fractions summing to 1.
///
/// Weights are scaled by the row maximum first, so the sum stays in
/// `[1, row.len()]` even for weights near `f64::MAX` or in the subnormal range.
fn transition_fractions(weights: &[f64], fractions: &mut [f64]) {
    let max = weights.iter().copied().fold(0.0, f64::max);
    if max <= 0.0 {
        return;
    }
    let scaled_total: f64 = weights.iter().map(|w| w / max).sum();
    for (fraction, w) in fractions.iter_mut().zip(weights) {
        *fraction = (w / max) / scaled_total;
    }
}

fn prefix_offsets(counts: &[usize]) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(counts.len() + 1);
    let mut running = 0;
    offsets.push(0);
    for &c in counts {
        running += c;
        offsets.push(running);
    }
    offsets
}
