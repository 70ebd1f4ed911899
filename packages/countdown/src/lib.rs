//! One-shot countdown latch for concurrent completion signaling.
//!
//! A [`CountdownLatch`] lets one thread wait for a fixed number of completions
//! recorded by other threads, without joining those threads individually. This
//! is the natural completion signal for work running on a shared worker pool,
//! where the individual execution units are not addressable or joinable.
//!
//! The latch is one-shot: it transitions from unset to set exactly once, when
//! the number of recorded completions reaches the target given at
//! construction. There is no reset and no timeout.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//!
//! use countdown::CountdownLatch;
//!
//! let latch = Arc::new(CountdownLatch::new(2));
//!
//! for _ in 0..2 {
//!     let latch = Arc::clone(&latch);
//!     thread::spawn(move || {
//!         // ... perform some work ...
//!         latch.count_down();
//!     });
//! }
//!
//! // Blocks until both threads have recorded their completion.
//! latch.wait();
//! assert_eq!(latch.remaining(), 0);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

use rsevents::{Awaitable, EventState, ManualResetEvent};

/// A one-shot completion signal that becomes set when a fixed number of
/// completions have been recorded.
///
/// Constructed with a target count, after which [`count_down()`][Self::count_down]
/// may be called exactly `target` times, from any threads. The caller whose
/// decrement exhausts the count releases every current and future waiter.
///
/// A latch constructed with a target of zero starts released.
///
/// # Example
///
/// ```
/// use countdown::CountdownLatch;
///
/// let latch = CountdownLatch::new(1);
/// assert_eq!(latch.remaining(), 1);
///
/// latch.count_down();
///
/// // Already released, so this returns immediately.
/// latch.wait();
/// ```
#[derive(derive_more::Debug)]
pub struct CountdownLatch {
    /// Completions still outstanding. Only ever decremented.
    remaining: AtomicUsize,

    /// Set exactly once, by the caller whose decrement exhausts the count.
    #[debug(ignore)]
    released: ManualResetEvent,
}

impl CountdownLatch {
    /// Creates a latch that is released after `target` completions.
    #[must_use]
    pub fn new(target: usize) -> Self {
        let initial_state = if target == 0 {
            EventState::Set
        } else {
            EventState::Unset
        };

        Self {
            remaining: AtomicUsize::new(target),
            released: ManualResetEvent::new(initial_state),
        }
    }

    /// Records one completion, releasing all waiters if it was the last one.
    ///
    /// The decrement and the decision to release are a single indivisible
    /// read-modify-write. If this were a separate load and store, two callers
    /// could both observe one outstanding completion and neither would
    /// release the latch, leaving every waiter blocked forever.
    ///
    /// # Panics
    ///
    /// Panics if called more than `target` times - the latch counts
    /// completions of a known-size set of work items, so an extra call means
    /// the caller's bookkeeping is broken.
    pub fn count_down(&self) {
        let previous = self.remaining.fetch_sub(1, Ordering::AcqRel);

        assert!(
            previous > 0,
            "count_down() called more times than the latch target"
        );

        if previous == 1 {
            self.released.set();
        }
    }

    /// Blocks the calling thread until the latch is released.
    ///
    /// Returns immediately if the latch is already released. The wait is
    /// unbounded - if a registered completion never arrives, this never
    /// returns.
    pub fn wait(&self) {
        self.released.wait();
    }

    /// Returns the number of completions still outstanding.
    ///
    /// Zero means the latch is released. The value is a snapshot and may be
    /// stale by the time the caller inspects it, except after
    /// [`wait()`][Self::wait] has returned, when it is zero forever.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::Acquire)
    }
}
