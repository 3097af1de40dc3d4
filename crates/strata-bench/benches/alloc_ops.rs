//! Criterion micro-benchmarks for tagged allocation and statistics.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use strata_alloc::{AllocStat, TagAllocator};
use strata_bench::{request_sizes, tag_set};

/// Benchmark: allocate and free 1K buffers across 64 tags.
fn bench_alloc_free_1k(c: &mut Criterion) {
    let alloc = TagAllocator::new();
    let sizes = request_sizes(1, 1000, 256);
    let tags = tag_set(64);
    c.bench_function("alloc_free_1k", |b| {
        b.iter(|| {
            for (i, &size) in sizes.iter().enumerate() {
                let buf = alloc.alloc(size, tags[i % tags.len()]).unwrap();
                black_box(&buf);
            }
        });
    });
}

/// Benchmark: single-tag lookup with 64 tags already in the table.
fn bench_stat_lookup(c: &mut Criterion) {
    let alloc = TagAllocator::new();
    let tags = tag_set(64);
    let held: Vec<_> = tags.iter().map(|&t| alloc.alloc(8, t).unwrap()).collect();
    c.bench_function("stat_lookup_64_tags", |b| {
        b.iter(|| {
            for &tag in &tags {
                black_box(alloc.stat(tag));
            }
        });
    });
    drop(held);
}

/// Benchmark: whole-table snapshot with 256 tags.
fn bench_stats_snapshot(c: &mut Criterion) {
    let alloc = TagAllocator::new();
    let tags = tag_set(256);
    let held: Vec<_> = tags.iter().map(|&t| alloc.alloc(8, t).unwrap()).collect();
    let mut buffer = vec![AllocStat::default(); 256];
    c.bench_function("stats_snapshot_256_tags", |b| {
        b.iter(|| black_box(alloc.stats(&mut buffer)));
    });
    drop(held);
}

criterion_group!(
    benches,
    bench_alloc_free_1k,
    bench_stat_lookup,
    bench_stats_snapshot
);
criterion_main!(benches);
