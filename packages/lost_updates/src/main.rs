//! Runs the increment workload in all three modes, in fixed order, and
//! reports the final counter value and elapsed wall time for each.
//!
//! The elapsed time is measured around the whole run operation, so the
//! warm-up pause of the thread-spawning modes is included in the reported
//! figure, as is the thread spawn/join overhead.

use std::sync::Arc;
use std::time::Instant;

use lost_updates::{LockMode, RaceCounter, RunConfig, ThreadPool, run_on_pool, run_on_spawned_threads};
use many_cpus::SystemHardware;

fn main() {
    let config = RunConfig::demo();
    let counter = Arc::new(RaceCounter::new());

    let start = Instant::now();
    let result = run_on_spawned_threads(config, &counter, LockMode::Unguarded);
    let elapsed = start.elapsed();
    println!("Final result without lock: {result}");
    println!("Time taken without lock: {} ms", elapsed.as_millis());
    println!();

    let start = Instant::now();
    let result = run_on_spawned_threads(config, &counter, LockMode::Guarded);
    let elapsed = start.elapsed();
    println!("Final result with lock: {result}");
    println!("Time taken with lock: {} ms", elapsed.as_millis());
    println!();

    // The pool is a process-wide resource that outlives the run using it;
    // dropping it at the end of main() is what joins its worker threads.
    let mut pool = ThreadPool::new(&SystemHardware::current().processors());

    let start = Instant::now();
    let result = run_on_pool(&mut pool, config, &counter, LockMode::Guarded);
    let elapsed = start.elapsed();
    println!("Final result using ThreadPool with lock: {result}");
    println!("Time taken using ThreadPool with lock: {} ms", elapsed.as_millis());
}
