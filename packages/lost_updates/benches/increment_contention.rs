//! Compares the uncontended cost of a guarded increment against an unguarded
//! one - the per-iteration price the mutex-guarded run modes pay even when no
//! other worker is competing for the lock.

#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use lost_updates::{LockMode, RaceCounter};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("increment");

    let counter = RaceCounter::new();

    group.bench_function("unguarded", |b| {
        b.iter(|| {
            counter.increment(LockMode::Unguarded);
            black_box(counter.current())
        });
    });

    group.bench_function("guarded", |b| {
        b.iter(|| {
            counter.increment(LockMode::Guarded);
            black_box(counter.current())
        });
    });

    group.finish();
}
