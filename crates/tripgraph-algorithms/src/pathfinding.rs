//! Pathfinding algorithms
//!
//! Unweighted shortest path over the undirected reading of a directed graph.

use super::common::{Adjacency, NodeIdx};
use std::collections::VecDeque;

/// Breadth-First Search (Unweighted Shortest Path)
///
/// Returns the node indices from `source` to `target` inclusive, or `None`
/// when `target` is not in the component of `source`. Neighbours are
/// expanded in `Adjacency` order, so ties between equally short paths are
/// always broken the same way. Both indices must be valid for `graph`.
pub fn bfs<G>(graph: &G, source: NodeIdx, target: NodeIdx) -> Option<Vec<NodeIdx>>
where
    G: Adjacency + ?Sized,
{
    if source == target {
        return Some(vec![source]);
    }

    // index -> parent_index, usize::MAX = unvisited
    let mut parent = vec![usize::MAX; graph.node_count()];
    let mut queue = VecDeque::new();

    parent[source] = source;
    queue.push_back(source);

    while let Some(current) = queue.pop_front() {
        for &next in graph.undirected_neighbors(current) {
            if parent[next] != usize::MAX {
                continue;
            }
            parent[next] = current;

            if next == target {
                // Reconstruct path
                let mut path = vec![target];
                let mut curr = target;
                while curr != source {
                    curr = parent[curr];
                    path.push(curr);
                }
                path.reverse();
                return Some(path);
            }

            queue.push_back(next);
        }
    }

    None
}
