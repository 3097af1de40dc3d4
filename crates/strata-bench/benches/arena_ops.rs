//! Criterion micro-benchmarks for frame arena allocation and unwinding.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use strata_alloc::TagAllocator;
use strata_arena::{ArenaConfig, FrameArena};
use strata_bench::request_sizes;
use strata_test_utils::unique_tag;

fn make_arena(segment_bytes: usize) -> (TagAllocator, FrameArena) {
    let alloc = TagAllocator::new();
    let arena = FrameArena::new(ArenaConfig::new(segment_bytes, unique_tag()), &alloc).unwrap();
    (alloc, arena)
}

/// Benchmark: 1K small allocations inside one frame, no growth.
fn bench_frame_bump_1k(c: &mut Criterion) {
    let (_alloc, mut arena) = make_arena(64 * 1024);
    let sizes = request_sizes(2, 1000, 48);
    c.bench_function("frame_bump_1k", |b| {
        b.iter(|| {
            arena.enter().unwrap();
            for &size in &sizes {
                black_box(arena.alloc(size).unwrap());
            }
            arena.leave();
        });
    });
}

/// Benchmark: the same workload on 4 KiB segments, growing and releasing
/// segments every iteration.
fn bench_frame_grow_release(c: &mut Criterion) {
    let (_alloc, mut arena) = make_arena(4096);
    let sizes = request_sizes(2, 1000, 48);
    c.bench_function("frame_grow_release", |b| {
        b.iter(|| {
            arena.enter().unwrap();
            for &size in &sizes {
                black_box(arena.alloc(size).unwrap());
            }
            arena.leave();
        });
    });
}

/// Benchmark: 64 nested frames, one allocation each.
fn bench_nested_frames(c: &mut Criterion) {
    let (_alloc, mut arena) = make_arena(4096);
    c.bench_function("nested_frames_64", |b| {
        b.iter(|| {
            for _ in 0..64 {
                arena.enter().unwrap();
                black_box(arena.alloc(32).unwrap());
            }
            for _ in 0..64 {
                arena.leave();
            }
        });
    });
}

criterion_group!(
    benches,
    bench_frame_bump_1k,
    bench_frame_grow_release,
    bench_nested_frames
);
criterion_main!(benches);
