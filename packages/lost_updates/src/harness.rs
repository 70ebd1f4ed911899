//! The three run modes of the demonstration.
//!
//! Each run operation resets the counter, executes the increment workload on
//! its worker units, blocks until every worker has completed, and returns the
//! final counter value. Nothing here prints - the caller measures elapsed
//! time around the whole operation and reports the result.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use countdown::CountdownLatch;

use crate::{LockMode, RaceCounter, ThreadPool};

/// Number of workers in the reference demonstration.
pub const WORKER_COUNT: usize = 3;

/// Increments each worker performs in the reference demonstration.
pub const INCREMENTS_PER_WORKER: u64 = 100_000;

/// Artificial pause before spawning workers in the thread-spawning runs.
///
/// It exists only to make the elapsed-time output more substantial; nothing
/// functionally depends on it. The worker-pool run does not pause.
pub const WARMUP_PAUSE: Duration = Duration::from_millis(1500);

/// Parameters for one run of the increment workload.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RunConfig {
    /// How many independent workers execute the increment workload.
    pub workers: usize,

    /// How many increments each worker performs.
    pub increments_per_worker: u64,

    /// Slept before spawning workers in [`run_on_spawned_threads()`].
    pub warmup: Duration,
}

impl RunConfig {
    /// The reference configuration: 3 workers x 100 000 increments, with the
    /// warm-up pause included in the measured interval.
    #[must_use]
    pub const fn demo() -> Self {
        Self {
            workers: WORKER_COUNT,
            increments_per_worker: INCREMENTS_PER_WORKER,
            warmup: WARMUP_PAUSE,
        }
    }

    /// An arbitrary configuration without the warm-up pause. This is what
    /// tests want - the pause adds nothing when nobody reads the timings.
    #[must_use]
    pub const fn without_warmup(workers: usize, increments_per_worker: u64) -> Self {
        Self {
            workers,
            increments_per_worker,
            warmup: Duration::ZERO,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::demo()
    }
}

/// Runs the increment workload on `config.workers` freshly spawned threads
/// and blocks until all of them have terminated.
///
/// The counter is reset first, so the result is independent of whatever ran
/// before. The join is unbounded: no timeout, no cancellation.
///
/// With [`LockMode::Guarded`] the returned value is exactly
/// `workers * increments_per_worker`. With [`LockMode::Unguarded`] there is
/// no such guarantee - the value is at most the product and, under parallel
/// execution, typically below it.
#[must_use = "the returned final counter value is the result of the run"]
pub fn run_on_spawned_threads(
    config: RunConfig,
    counter: &Arc<RaceCounter>,
    mode: LockMode,
) -> u64 {
    counter.reset();

    thread::sleep(config.warmup);

    let workers: Vec<_> = (0..config.workers)
        .map(|_| {
            thread::spawn({
                let counter = Arc::clone(counter);
                let iterations = config.increments_per_worker;
                move || counter.increment_many(iterations, mode)
            })
        })
        .collect();

    for worker in workers {
        worker.join().expect("increment worker panicked");
    }

    counter.current()
}

/// Runs the increment workload as `config.workers` work items on the shared
/// worker pool and blocks until all of them have recorded completion.
///
/// Pool work items are not individually joinable, so each item counts down a
/// [`CountdownLatch`] after finishing its workload and the harness waits on
/// the latch instead of joining workers. The latch releases exactly once,
/// only after the last item's completion is recorded.
///
/// The guarantees on the returned value are the same as for
/// [`run_on_spawned_threads()`]; the execution model does not change the
/// workload.
#[must_use = "the returned final counter value is the result of the run"]
pub fn run_on_pool(
    pool: &mut ThreadPool,
    config: RunConfig,
    counter: &Arc<RaceCounter>,
    mode: LockMode,
) -> u64 {
    counter.reset();

    let latch = Arc::new(CountdownLatch::new(config.workers));

    for _ in 0..config.workers {
        pool.submit({
            let counter = Arc::clone(counter);
            let latch = Arc::clone(&latch);
            let iterations = config.increments_per_worker;
            move || {
                counter.increment_many(iterations, mode);
                latch.count_down();
            }
        });
    }

    latch.wait();

    counter.current()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guarded_thread_run_is_exact() {
        let counter = Arc::new(RaceCounter::new());
        let config = RunConfig::without_warmup(4, 10_000);

        let result = run_on_spawned_threads(config, &counter, LockMode::Guarded);

        assert_eq!(result, 40_000);
    }

    #[test]
    fn unguarded_thread_run_never_overcounts() {
        let counter = Arc::new(RaceCounter::new());
        let config = RunConfig::without_warmup(4, 10_000);

        let result = run_on_spawned_threads(config, &counter, LockMode::Unguarded);

        assert!(result <= 40_000);
    }

    #[test]
    fn zero_workers_produce_zero() {
        let counter = Arc::new(RaceCounter::new());
        let config = RunConfig::without_warmup(0, 10_000);

        let result = run_on_spawned_threads(config, &counter, LockMode::Guarded);

        assert_eq!(result, 0);
    }

    #[test]
    fn zero_increments_produce_zero() {
        let counter = Arc::new(RaceCounter::new());
        let config = RunConfig::without_warmup(4, 0);

        let result = run_on_spawned_threads(config, &counter, LockMode::Guarded);

        assert_eq!(result, 0);
    }

    #[test]
    fn runs_are_order_independent() {
        // Because every run resets the counter, a guarded run must produce
        // the same result regardless of what ran before it.
        let counter = Arc::new(RaceCounter::new());
        let config = RunConfig::without_warmup(3, 10_000);

        let guarded_first = run_on_spawned_threads(config, &counter, LockMode::Guarded);
        let _unguarded = run_on_spawned_threads(config, &counter, LockMode::Unguarded);
        let guarded_second = run_on_spawned_threads(config, &counter, LockMode::Guarded);

        assert_eq!(guarded_first, 30_000);
        assert_eq!(guarded_second, guarded_first);
    }

    #[cfg(not(miri))] // The pool's processor APIs are not supported under Miri.
    mod pool {
        use many_cpus::SystemHardware;

        use super::*;

        #[test]
        fn guarded_pool_run_is_exact() {
            let counter = Arc::new(RaceCounter::new());
            let config = RunConfig::without_warmup(3, 10_000);

            let mut pool = ThreadPool::new(&SystemHardware::current().processors());

            let result = run_on_pool(&mut pool, config, &counter, LockMode::Guarded);

            assert_eq!(result, 30_000);
        }

        #[test]
        fn zero_workers_do_not_block_the_pool_run() {
            let counter = Arc::new(RaceCounter::new());
            let config = RunConfig::without_warmup(0, 10_000);

            let mut pool = ThreadPool::new(&SystemHardware::current().processors());

            let result = run_on_pool(&mut pool, config, &counter, LockMode::Guarded);

            assert_eq!(result, 0);
        }

        #[test]
        fn pool_is_reusable_across_runs() {
            let counter = Arc::new(RaceCounter::new());
            let config = RunConfig::without_warmup(3, 1000);

            let mut pool = ThreadPool::new(&SystemHardware::current().processors());

            let first = run_on_pool(&mut pool, config, &counter, LockMode::Guarded);
            let second = run_on_pool(&mut pool, config, &counter, LockMode::Guarded);

            assert_eq!(first, 3000);
            assert_eq!(second, 3000);
        }
    }
}
