//! Criterion comparison of the registered layouts at small element counts.
//!
//! Run with:
//! ```bash
//! cargo bench --bench layouts
//! cargo bench --bench layouts -- map-rank
//! ```
//!
//! Runs at tens of millions of elements belong to the driver binary.

use std::collections::HashMap;

use cellbench::{Cell88, DEFAULT_SEED, Key, LogicalKey, RunConfig, VARIANTS, runner};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

const COUNTS: &[usize] = &[255 * 64, 255 * 1024];

// ============================================================================
// Full runs (generation + compute + reclaim)
// ============================================================================

fn bench_variants(c: &mut Criterion) {
    for &count in COUNTS {
        let mut group = c.benchmark_group(format!("run/{count}"));
        group.throughput(Throughput::Elements(count as u64));

        for variant in VARIANTS {
            group.bench_with_input(BenchmarkId::from_parameter(variant.name), &count, |b, &n| {
                b.iter(|| black_box(variant.run(n, Some(DEFAULT_SEED))));
            });
        }

        group.finish();
    }
}

// ============================================================================
// Compute phase only, composite-keyed map vs flat vector
// ============================================================================

fn bench_lookup(c: &mut Criterion) {
    let count = 255 * 1024;
    let mut group = c.benchmark_group("lookup");
    group.throughput(Throughput::Elements(count as u64));

    let vec_run = runner::execute::<usize, Vec<Box<Cell88>>>(&RunConfig::new(count));
    group.bench_function("vec-box-88", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for i in 0..count {
                sum += vec_run.a[i].value() * vec_run.b[i].value();
            }
            black_box(sum)
        });
    });

    let map_run = runner::execute::<Key, HashMap<Key, Box<Cell88>>>(&RunConfig::new(count));
    let keys: Vec<Key> = (0..count).map(|i| Key::from_index(i, count)).collect();
    group.bench_function("map-rank-box-88", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for key in &keys {
                sum += map_run.a[key].value() * map_run.b[key].value();
            }
            black_box(sum)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_variants, bench_lookup);
criterion_main!(benches);
