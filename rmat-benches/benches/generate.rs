//! R-MAT generation benchmarks.
//!
//! Measures end-to-end graph generation (edge synthesis plus vertex-set
//! derivation) and edge-only synthesis, with and without per-bit noise.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
#![expect(
    clippy::shadow_reuse,
    reason = "Criterion bench_with_input closures rebind parameter names"
)]
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use rmat_benches::{GenerateBenchParams, size_presets};
use rmat_core::RmatError;

const NOISE: f32 = 0.1;

fn generate_graph_impl(c: &mut Criterion) -> Result<(), RmatError> {
    let mut group = c.benchmark_group("generate");
    group.sample_size(10);

    for params in size_presets() {
        for noise in [None, Some(NOISE)] {
            let params = GenerateBenchParams { noise, ..params };
            let rmat = params.build()?;
            group.throughput(Throughput::Elements(params.edge_count));
            group.bench_with_input(BenchmarkId::from_parameter(params), &rmat, |b, rmat| {
                b.iter(|| rmat.generate());
            });
        }
    }

    group.finish();
    Ok(())
}

fn generate_edges_impl(c: &mut Criterion) -> Result<(), RmatError> {
    let mut group = c.benchmark_group("generate_edges");
    group.sample_size(10);

    for params in size_presets() {
        let rmat = params.build()?;
        group.throughput(Throughput::Elements(params.edge_count));
        group.bench_with_input(BenchmarkId::from_parameter(params), &rmat, |b, rmat| {
            b.iter(|| rmat.generate_edges());
        });
    }

    group.finish();
    Ok(())
}

fn generate_graph(c: &mut Criterion) {
    if let Err(err) = generate_graph_impl(c) {
        panic!("generate benchmark setup failed: {err}");
    }
}

fn generate_edges(c: &mut Criterion) {
    if let Err(err) = generate_edges_impl(c) {
        panic!("generate_edges benchmark setup failed: {err}");
    }
}

criterion_group!(benches, generate_graph, generate_edges);
criterion_main!(benches);
