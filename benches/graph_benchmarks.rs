use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use tripgraph::{
    EdgeStore, EngineConfig, PathEngine, Projection, ProjectionId, QueryFacade, RankEngine,
};

/// Pseudo-random but reproducible trip list over `zones` locations
fn trips(zones: usize, count: usize) -> Vec<(String, String, f64)> {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    (0..count)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let s = (state % zones as u64) as usize;
            let t = ((state >> 20) % zones as u64) as usize;
            let w = ((state >> 40) % 100) as f64 / 10.0;
            (format!("zone{}", s), format!("zone{}", t), w)
        })
        .collect()
}

fn store_with(zones: usize, count: usize) -> EdgeStore {
    let mut store = EdgeStore::new();
    for (s, t, w) in trips(zones, count) {
        store.ingest(&s, &t, w).unwrap();
    }
    store
}

/// Benchmark trip ingestion throughput
fn bench_ingest(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest");

    for size in [1_000, 10_000, 100_000].iter() {
        let data = trips(260, *size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut store = EdgeStore::new();
                for (s, t, w) in &data {
                    store.ingest(s, t, *w).unwrap();
                }
                criterion::black_box(store.edge_count());
            });
        });
    }
    group.finish();
}

/// Benchmark snapshot + CSR materialization
fn bench_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection");

    for size in [10_000, 100_000].iter() {
        let store = store_with(260, *size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let projection =
                    Projection::materialize(ProjectionId(1), "bench", store.snapshot());
                criterion::black_box(projection.edge_count());
            });
        });
    }
    group.finish();
}

/// Benchmark PageRank on a materialized projection
fn bench_pagerank(c: &mut Criterion) {
    let mut group = c.benchmark_group("pagerank");
    let engine = RankEngine::default();

    for size in [10_000, 100_000].iter() {
        let snapshot = store_with(260, *size).snapshot();
        let projection = Projection::materialize(ProjectionId(1), "bench", snapshot);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let result = engine.rank(&projection, 10).unwrap();
                criterion::black_box(result.len());
            });
        });
    }
    group.finish();
}

/// Benchmark BFS against the live store and through the facade
fn bench_shortest_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("shortest_path");

    let store = store_with(2_000, 20_000);
    group.bench_function("live_store", |b| {
        b.iter(|| {
            let outcome = PathEngine::new().shortest_path(&store, "zone1", "zone1999");
            criterion::black_box(outcome.ok());
        });
    });

    let facade = QueryFacade::new(EngineConfig::default()).unwrap();
    for (s, t, w) in trips(2_000, 20_000) {
        facade.ingest(&s, &t, w).unwrap();
    }
    group.bench_function("facade", |b| {
        b.iter(|| {
            let outcome = facade.shortest_path("zone1", "zone1999");
            criterion::black_box(outcome.ok());
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_ingest,
    bench_projection,
    bench_pagerank,
    bench_shortest_path
);
criterion_main!(benches);
