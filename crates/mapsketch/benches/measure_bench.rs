//! Criterion benchmarks for ring measurement.
//! Focus sizes: n in {3, 10, 50, 200, 1000} vertices.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use mapsketch::geometry::rand::{draw_ring_radial, ReplayToken, RingCfg, VertexCount};
use mapsketch::geometry::{compute_area, measure_polygon, segment_lengths, MeasureCfg};

fn ring(n: usize, seed: u64) -> Vec<mapsketch::Coord> {
    let cfg = RingCfg {
        vertex_count: VertexCount::Fixed(n),
        ..RingCfg::default()
    };
    draw_ring_radial(cfg, ReplayToken { seed, index: 0 })
}

fn bench_measure(c: &mut Criterion) {
    let mut group = c.benchmark_group("measure");
    for &n in &[3usize, 10, 50, 200, 1000] {
        group.bench_with_input(BenchmarkId::new("compute_area", n), &n, |b, &n| {
            b.iter_batched(
                || ring(n, 43),
                |r| {
                    let _a = compute_area(&r).unwrap();
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("segment_lengths_open", n), &n, |b, &n| {
            b.iter_batched(
                || ring(n, 44),
                |r| {
                    let _l = segment_lengths(&r, MeasureCfg::open()).unwrap();
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("measure_polygon", n), &n, |b, &n| {
            b.iter_batched(
                || ring(n, 45),
                |r| {
                    let _m = measure_polygon(&r, MeasureCfg::default()).unwrap();
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_measure);
criterion_main!(benches);
