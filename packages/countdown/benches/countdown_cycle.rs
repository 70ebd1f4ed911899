//! Benchmarks the cost of the latch primitive itself: recording a completion
//! on a far-from-released latch, and a full create/release/wait cycle.

#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;

use countdown::CountdownLatch;
use criterion::{Criterion, criterion_group, criterion_main};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("countdown");

    // A latch this far from release never gets exhausted by the benchmark,
    // so every iteration measures only the decrement fast path.
    let far_from_released = CountdownLatch::new(usize::MAX);

    group.bench_function("count_down", |b| {
        b.iter(|| far_from_released.count_down());
    });

    group.bench_function("full_cycle", |b| {
        b.iter(|| {
            let latch = CountdownLatch::new(1);
            latch.count_down();
            latch.wait();
            black_box(latch.remaining())
        });
    });

    group.finish();
}
