//! Weighted PageRank via power iteration
//!
//! Scores start at `1/N` and always sum to 1: rank held by dangling nodes
//! (zero total out-weight) is spread uniformly over every node.

use super::common::GraphView;
use std::convert::Infallible;
use std::fmt;

/// PageRank configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct PageRankConfig {
    /// Damping factor (usually 0.85)
    pub damping_factor: f64,
    /// Upper bound on the number of iterations
    pub max_iterations: usize,
    /// Stop once the L1 change of one iteration drops below this value
    pub tolerance: f64,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.85,
            max_iterations: 20,
            tolerance: 1e-7,
        }
    }
}

/// Outcome of a PageRank run
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageRankRun {
    /// Score per dense node index
    pub scores: Vec<f64>,
    /// Iterations actually executed
    pub iterations: usize,
    /// Whether the tolerance was reached before `max_iterations`
    pub converged: bool,
    /// L1 change of the last iteration
    pub delta: f64,
}

/// The stop hook asked the computation to end early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interrupted {
    /// Iterations completed before the stop was observed
    pub iterations: usize,
}

impl fmt::Display for Interrupted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "interrupted after {} iterations", self.iterations)
    }
}

impl std::error::Error for Interrupted {}

/// Calculate PageRank for the graph view
pub fn page_rank(view: &GraphView, config: &PageRankConfig) -> PageRankRun {
    match iterate(view, config, |_| Ok::<(), Infallible>(())) {
        Ok(run) => run,
        Err(never) => match never {},
    }
}

/// Calculate PageRank, polling `should_stop` before every iteration.
pub fn page_rank_until<F>(
    view: &GraphView,
    config: &PageRankConfig,
    mut should_stop: F,
) -> Result<PageRankRun, Interrupted>
where
    F: FnMut() -> bool,
{
    iterate(view, config, |iterations| {
        if should_stop() {
            Err(Interrupted { iterations })
        } else {
            Ok(())
        }
    })
}

/// Power iteration; `check` runs before each iteration with the count so far.
fn iterate<E, F>(view: &GraphView, config: &PageRankConfig, mut check: F) -> Result<PageRankRun, E>
where
    F: FnMut(usize) -> Result<(), E>,
{
    let n = view.node_count;

    if n == 0 {
        return Ok(PageRankRun {
            scores: Vec::new(),
            iterations: 0,
            converged: true,
            delta: 0.0,
        });
    }

    let nf = n as f64;
    let d = config.damping_factor;
    let base = (1.0 - d) / nf;

    let mut scores = vec![1.0 / nf; n];
    let mut next_scores = vec![0.0; n];
    let mut iterations = 0;
    let mut delta = f64::INFINITY;
    let mut converged = false;

    while iterations < config.max_iterations {
        check(iterations)?;

        // Mass sitting on dangling nodes, shared by everyone
        let dangling: f64 = (0..n)
            .filter(|&u| view.is_dangling(u))
            .map(|u| scores[u])
            .sum();
        let teleport = base + d * dangling / nf;
        next_scores.iter_mut().for_each(|s| *s = teleport);

        for u in 0..n {
            let pushed = d * scores[u];
            for (&v, &fraction) in view.successors(u).iter().zip(view.fractions(u)) {
                next_scores[v] += pushed * fraction;
            }
        }

        delta = scores
            .iter()
            .zip(next_scores.iter())
            .map(|(a, b)| (a - b).abs())
            .sum();

        std::mem::swap(&mut scores, &mut next_scores);
        iterations += 1;

        if delta < config.tolerance {
            converged = true;
            break;
        }
    }

    Ok(PageRankRun {
        scores,
        iterations,
        converged,
        delta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cycle(n: usize) -> GraphView {
        GraphView::from_edges(n, (0..n).map(|i| (i, (i + 1) % n, 1.0)))
    }

    #[test]
    fn test_empty_graph() {
        let run = page_rank(&GraphView::from_edges(0, Vec::new()), &PageRankConfig::default());
        assert!(run.scores.is_empty());
        assert_eq!(run.iterations, 0);
    }

    #[test]
    fn test_single_node() {
        let view = GraphView::from_edges(1, Vec::new());
        let run = page_rank(&view, &PageRankConfig::default());
        assert!((run.scores[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cycle_is_uniform() {
        let view = cycle(5);
        let run = page_rank(&view, &PageRankConfig::default());
        for s in &run.scores {
            assert!((s - 0.2).abs() < 1e-9);
        }
        assert!(run.converged);
    }

    #[test]
    fn test_weights_steer_rank() {
        // 0 -> 1 (9.0), 0 -> 2 (1.0); 1 and 2 point back to 0
        let view = GraphView::from_edges(
            3,
            vec![(0, 1, 9.0), (0, 2, 1.0), (1, 0, 1.0), (2, 0, 1.0)],
        );
        let config = PageRankConfig {
            max_iterations: 100,
            ..Default::default()
        };
        let run = page_rank(&view, &config);
        assert!(run.scores[1] > run.scores[2]);
        assert!(run.scores[0] > run.scores[1]);
    }

    #[test]
    fn test_huge_weights_keep_mass() {
        // out-weights of node 0 add up past f64::MAX
        let view = GraphView::from_edges(
            3,
            vec![(0, 1, 1e308), (0, 2, 1e308), (1, 0, 1.0), (2, 0, 1.0)],
        );
        let run = page_rank(&view, &PageRankConfig::default());
        let total: f64 = run.scores.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!((run.scores[1] - run.scores[2]).abs() < 1e-12);
        assert!(run.scores[0] > run.scores[1]);
    }

    #[test]
    fn test_subnormal_weights_stay_finite() {
        let view = GraphView::from_edges(2, vec![(0, 1, 5e-324), (1, 0, 1.0)]);
        let run = page_rank(&view, &PageRankConfig::default());
        assert!(run.scores.iter().all(|s| s.is_finite()));
        assert!((run.scores[0] - 0.5).abs() < 1e-9);
        assert!((run.scores[1] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_zero_weight_out_edges_count_as_dangling() {
        // 0 -> 1 with weight 0: node 0 behaves like a sink
        let weighted = GraphView::from_edges(2, vec![(0, 1, 0.0)]);
        let bare = GraphView::from_edges(2, Vec::new());
        let config = PageRankConfig::default();
        assert_eq!(page_rank(&weighted, &config).scores, page_rank(&bare, &config).scores);
    }

    #[test]
    fn test_iteration_bound_is_not_failure() {
        let view = GraphView::from_edges(3, vec![(0, 1, 1.0), (1, 2, 1.0)]);
        let config = PageRankConfig {
            max_iterations: 2,
            tolerance: 0.0,
            ..Default::default()
        };
        let run = page_rank(&view, &config);
        assert_eq!(run.iterations, 2);
        assert!(!run.converged);
    }

    #[test]
    fn test_stop_hook_interrupts_between_iterations() {
        let view = cycle(4);
        let config = PageRankConfig {
            tolerance: 0.0,
            max_iterations: 50,
            ..Default::default()
        };
        let mut polls = 0;
        let result = page_rank_until(&view, &config, || {
            polls += 1;
            polls > 3
        });
        assert_eq!(result, Err(Interrupted { iterations: 3 }));
    }

    fn arb_weight() -> impl Strategy<Value = f64> {
        prop_oneof![
            4 => 0.0f64..10.0,
            1 => Just(0.0),
            1 => Just(5e-324),
            1 => 1e300f64..f64::MAX,
        ]
    }

    fn arb_graph() -> impl Strategy<Value = (usize, Vec<(usize, usize, f64)>)> {
        (1usize..12).prop_flat_map(|n| {
            let edge = (0..n, 0..n, arb_weight());
            (Just(n), prop::collection::vec(edge, 0..40))
        })
    }

    proptest! {
        #[test]
        fn prop_mass_is_conserved((n, edges) in arb_graph(), iterations in 1usize..15) {
            let view = GraphView::from_edges(n, edges);
            let config = PageRankConfig {
                max_iterations: iterations,
                tolerance: 0.0,
                ..Default::default()
            };
            let run = page_rank(&view, &config);
            let total: f64 = run.scores.iter().sum();
            prop_assert!((total - 1.0).abs() < 1e-9);
            prop_assert!(run.scores.iter().all(|s| *s >= 0.0));
        }
    }
}
