//! Demonstrates the effect of synchronization on a shared mutable counter
//! under concurrent increment workloads.
//!
//! The same workload - several workers each performing a fixed number of
//! read-modify-write increments of one shared counter - runs three ways:
//!
//! 1. Unsynchronized, on freshly spawned threads: concurrent increments
//!    interleave and updates are lost, so the final value is typically less
//!    than the worker count times the per-worker increment count. This
//!    non-determinism is the point of the demonstration, not a defect.
//! 2. Mutex-guarded, on freshly spawned threads: every increment holds the
//!    lock for exactly one read-modify-write, all updates serialize, and the
//!    final value is exactly the product.
//! 3. Mutex-guarded, as work items on a reusable worker pool. Pool work items
//!    are not individually joinable, so the harness observes completion
//!    through a [`countdown::CountdownLatch`] instead of joining workers.
//!
//! The `lost_updates` binary runs the three modes in sequence and prints the
//! final counter value and elapsed wall time for each.

mod counter;
mod harness;
mod threadpool;

pub use counter::*;
pub use harness::*;
pub use threadpool::*;
