//! The shared counter at the heart of the demonstration, together with the
//! mutex that optionally guards it.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

// A poisoned lock means a worker panicked mid-increment; there is no recovery
// path in this system, so we exit loudly.
const ERR_POISONED_LOCK: &str =
    "encountered poisoned lock - a worker panicked mid-increment and the counter \
    can no longer be trusted";

/// Selects whether the increment workload brackets each read-modify-write in
/// the counter's mutex.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LockMode {
    /// Increments touch the counter directly. Concurrent workers interleave
    /// their read-modify-write sequences and updates are lost.
    Unguarded,

    /// Every increment holds the mutex for exactly one read-modify-write,
    /// the minimal critical section. All updates serialize.
    Guarded,
}

/// A shared counter paired with the mutex that optionally guards it.
///
/// The value is stored in an atomic only so that the unguarded mode is
/// expressible without undefined behavior: the increment is a separate
/// relaxed load and store, which concurrent workers can interleave, losing
/// updates exactly like an unsynchronized `count += 1` would.
///
/// The guarded modes do not rely on the atomic for correctness - serialization
/// comes from the mutex, and the harness reads the final value only after
/// every worker has completed (join or completion signal), which establishes
/// the necessary visibility.
#[derive(Debug, Default)]
pub struct RaceCounter {
    value: AtomicU64,
    lock: Mutex<()>,
}

impl RaceCounter {
    /// Creates a counter starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            value: AtomicU64::new(0),
            lock: Mutex::new(()),
        }
    }

    /// Resets the counter to zero.
    ///
    /// Each run mode resets before spawning workers, which is what makes run
    /// results independent of the order in which modes execute.
    pub fn reset(&self) {
        self.value.store(0, Ordering::Relaxed);
    }

    /// Returns the current counter value.
    ///
    /// Meaningful only once all workers mutating the counter have completed;
    /// while a run is in flight this is just a racy snapshot.
    #[must_use]
    pub fn current(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Performs one increment, guarded or unguarded per `mode`.
    pub fn increment(&self, mode: LockMode) {
        match mode {
            LockMode::Unguarded => self.read_modify_write(),
            LockMode::Guarded => {
                let _guard = self.lock.lock().expect(ERR_POISONED_LOCK);
                self.read_modify_write();
            }
        }
    }

    /// The increment workload shared by every run mode: exactly `iterations`
    /// sequential increments.
    pub fn increment_many(&self, iterations: u64, mode: LockMode) {
        for _ in 0..iterations {
            self.increment(mode);
        }
    }

    /// The non-atomic read-modify-write. The window between the load and the
    /// store is where concurrent updates get lost in unguarded mode.
    fn read_modify_write(&self) {
        let current = self.value.load(Ordering::Relaxed);
        self.value.store(current.wrapping_add(1), Ordering::Relaxed);
    }
}
