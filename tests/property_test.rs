use proptest::prelude::*;
use tripgraph::{EngineConfig, PathOutcome, QueryFacade};

fn weight() -> impl Strategy<Value = f64> {
    prop_oneof![
        4 => 0.0f64..50.0,
        1 => Just(0.0),
        1 => Just(5e-324),
        1 => 1e300f64..f64::MAX,
    ]
}

/// Zone count plus a trip list over `Z0..Zn`
fn trips() -> impl Strategy<Value = (usize, Vec<(usize, usize, f64)>)> {
    (1usize..10).prop_flat_map(|n| {
        let trip = (0..n, 0..n, weight());
        (Just(n), prop::collection::vec(trip, 1..30))
    })
}

fn facade_with(trips: &[(usize, usize, f64)]) -> QueryFacade {
    let facade = QueryFacade::new(EngineConfig::default()).unwrap();
    for &(s, t, w) in trips {
        facade.ingest(&format!("Z{}", s), &format!("Z{}", t), w).unwrap();
    }
    facade
}

fn joined_by_trip(facade: &QueryFacade, a: &str, b: &str) -> bool {
    let store = facade.store().read();
    let (Some(a), Some(b)) = (store.index_of(a), store.index_of(b)) else {
        return false;
    };
    store
        .trips()
        .iter()
        .any(|t| (t.source == a && t.target == b) || (t.source == b && t.target == a))
}

proptest! {
    #[test]
    fn prop_ranking_covers_all_mass((_, trips) in trips()) {
        let facade = facade_with(&trips);
        let nodes = facade.stats().nodes;

        let ranking = facade.rank("trips", nodes).unwrap();
        prop_assert_eq!(ranking.len(), nodes);

        let total: f64 = ranking.entries.iter().map(|e| e.score).sum();
        prop_assert!((total - 1.0).abs() < 1e-9, "scores sum to {}", total);
        prop_assert!(ranking.entries.iter().all(|e| e.score.is_finite() && e.score >= 0.0));
        prop_assert!(ranking.entries.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn prop_paths_follow_trips((n, trips) in trips(), start in 0usize..10, end in 0usize..10) {
        let facade = facade_with(&trips);
        let start = format!("Z{}", start % n);
        let end = format!("Z{}", end % n);
        let store_has = |name: &str| facade.store().read().contains(name);
        prop_assume!(store_has(&start) && store_has(&end));

        match facade.shortest_path(&start, &end).unwrap() {
            PathOutcome::Found(path) => {
                prop_assert_eq!(path.first(), Some(&start));
                prop_assert_eq!(path.last(), Some(&end));
                prop_assert!(path.len() <= facade.stats().nodes);
                for pair in path.windows(2) {
                    prop_assert!(joined_by_trip(&facade, &pair[0], &pair[1]));
                }
            }
            PathOutcome::NoPath => prop_assert_ne!(&start, &end),
        }
    }
}
