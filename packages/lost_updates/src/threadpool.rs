//! Reusable worker pool for running independent work items.

use std::num::NonZero;
use std::sync::{Arc, Mutex, mpsc};
use std::thread::{self, JoinHandle};
use std::{fmt, iter};

use many_cpus::ProcessorSet;

/// A reusable set of worker threads, one per processor in the processor set
/// the pool is constructed from, each pinned to its processor.
///
/// Work items are submitted with [`submit()`][Self::submit] and are
/// fire-and-forget: the pool hands out no handle to an individual item, so a
/// caller that needs to know when its work has finished pairs submissions
/// with a completion signal such as [`countdown::CountdownLatch`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use countdown::CountdownLatch;
/// use lost_updates::ThreadPool;
/// use many_cpus::SystemHardware;
///
/// let mut pool = ThreadPool::new(&SystemHardware::current().processors());
///
/// let done = Arc::new(CountdownLatch::new(1));
/// pool.submit({
///     let done = Arc::clone(&done);
///     move || done.count_down()
/// });
///
/// done.wait();
/// ```
///
/// # Lifecycle
///
/// The pool is intended to be constructed once and reused across many
/// submissions. Dropping it delivers a shutdown command to every worker and
/// waits for all of them to finish executing previously submitted work.
pub struct ThreadPool {
    command_txs: Vec<mpsc::Sender<Command>>,
    join_handles: Vec<JoinHandle<()>>,
    thread_count: NonZero<usize>,

    // Round-robin dispatch cursor; always a valid index into `command_txs`.
    next_worker: usize,
}

impl ThreadPool {
    /// Creates a pool with one thread per processor in the provided set.
    ///
    /// Each thread is bound to its corresponding processor for the lifetime
    /// of the pool.
    #[must_use]
    pub fn new(processors: &ProcessorSet) -> Self {
        let (txs, rxs): (Vec<_>, Vec<_>) = iter::repeat_with(mpsc::channel)
            .take(processors.len())
            .unzip();

        let rxs = Arc::new(Mutex::new(rxs));

        let join_handles = processors
            .spawn_threads({
                let rxs = Arc::clone(&rxs);
                move |_| {
                    let rx = rxs
                        .lock()
                        .expect("no thread can panic while holding this lock")
                        .pop()
                        .expect("exactly one receiver exists per worker thread");
                    worker_entrypoint(&rx);
                }
            })
            .into_vec();

        Self {
            thread_count: NonZero::new(txs.len())
                .expect("guarded by fact that ProcessorSet is never empty"),
            command_txs: txs,
            join_handles,
            next_worker: 0,
        }
    }

    /// Returns the number of threads in the pool.
    #[must_use]
    pub fn thread_count(&self) -> NonZero<usize> {
        self.thread_count
    }

    /// Enqueues one work item for execution on one of the pool threads.
    ///
    /// Items are dispatched round-robin across the workers. Items dispatched
    /// to the same worker run in submission order; across workers there is no
    /// ordering guarantee.
    pub fn submit<F>(&mut self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.command_txs
            .get(self.next_worker)
            .expect("cursor is always a valid index into the sender list")
            .send(Command::Execute(Box::new(f)))
            .expect("worker thread must still exist - the pool only stops workers on drop");

        self.next_worker = self.next_worker.wrapping_add(1);
        if self.next_worker == self.command_txs.len() {
            self.next_worker = 0;
        }
    }
}

impl fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadPool")
            .field("thread_count", &self.thread_count)
            .field("next_worker", &self.next_worker)
            .finish_non_exhaustive()
    }
}

impl Drop for ThreadPool {
    #[cfg_attr(test, mutants::skip)] // Impractical to test that stuff stops happening.
    fn drop(&mut self) {
        if thread::panicking() {
            // We are probably in a dirty state and shutting down may make the
            // problem worse by hiding the original panic, so just do nothing.
            return;
        }

        for tx in self.command_txs.drain(..) {
            tx.send(Command::Shutdown)
                .expect("worker thread must still exist to receive shutdown");
        }

        for handle in self.join_handles.drain(..) {
            handle.join().expect("worker thread panicked");
        }
    }
}

enum Command {
    Execute(Box<dyn FnOnce() + Send>),
    Shutdown,
}

#[cfg_attr(test, mutants::skip)] // Impractical to test that things do not happen when the loop is missing.
fn worker_entrypoint(rx: &mpsc::Receiver<Command>) {
    while let Command::Execute(f) = rx
        .recv()
        .expect("command channel disconnected while worker still running")
    {
        f();
    }
}
