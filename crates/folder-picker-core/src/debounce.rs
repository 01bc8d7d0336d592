//! Cancellable trailing-edge debounce timer.
//!
//! A [`Debouncer`] owns at most one pending timer task. Each call to
//! [`schedule`](Debouncer::schedule) cancels the pending task and starts a new
//! one, so a burst of calls within the delay window runs only the last job.
//! After [`dispose`](Debouncer::dispose) nothing is scheduled or run again.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// A trailing-edge debouncer running jobs on a tokio runtime.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    runtime: Handle,
    pending: Mutex<Option<JoinHandle<()>>>,
    generation: AtomicU64,
    disposed: AtomicBool,
}

impl Debouncer {
    /// Create a debouncer that waits `delay` of inactivity before running a job.
    pub fn new(delay: Duration, runtime: Handle) -> Self {
        Self {
            delay,
            runtime,
            pending: Mutex::new(None),
            generation: AtomicU64::new(0),
            disposed: AtomicBool::new(false),
        }
    }

    /// The idle delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `job`, replacing any job that has not fired yet.
    ///
    /// Returns `false` if the debouncer has been disposed.
    pub fn schedule<F>(&self, job: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.is_disposed() {
            return false;
        }

        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let delay = self.delay;
        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            job.await;
        });

        let mut pending = self.pending.lock();
        if let Some(previous) = pending.replace(task) {
            previous.abort();
            tracing::trace!(target: "folder_picker_core::debounce", generation, "coalesced pending job");
        }
        // A dispose that raced with this call must not leave a live timer behind.
        if self.is_disposed()
            && let Some(task) = pending.take()
        {
            task.abort();
            return false;
        }
        true
    }

    /// Cancel the pending job, if any, without disposing.
    pub fn cancel(&self) -> bool {
        match self.pending.lock().take() {
            Some(task) => {
                task.abort();
                true
            }
            None => false,
        }
    }

    /// Whether a job is waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Cancel the pending job and refuse all future ones.
    ///
    /// Returns `true` only for the call that performed the disposal.
    pub fn dispose(&self) -> bool {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.cancel();
        tracing::debug!(target: "folder_picker_core::debounce", "debouncer disposed");
        true
    }

    /// Whether [`dispose`](Self::dispose) has been called.
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    use futures_util::future::BoxFuture;

    fn recorder() -> (Arc<Mutex<Vec<u32>>>, impl Fn(u32) -> BoxFuture<'static, ()>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = calls.clone();
        let job = move |value: u32| -> BoxFuture<'static, ()> {
            let sink = sink.clone();
            Box::pin(async move { sink.lock().push(value) })
        };
        (calls, job)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_runs_only_last_job() {
        let debouncer = Debouncer::new(Duration::from_millis(100), Handle::current());
        let (calls, job) = recorder();

        debouncer.schedule(job(1));
        tokio::time::sleep(Duration::from_millis(50)).await;
        debouncer.schedule(job(2));
        tokio::time::sleep(Duration::from_millis(50)).await;
        debouncer.schedule(job(3));
        assert!(calls.lock().is_empty());

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(*calls.lock(), vec![3]);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_calls_all_fire() {
        let debouncer = Debouncer::new(Duration::from_millis(10), Handle::current());
        let (calls, job) = recorder();

        debouncer.schedule(job(1));
        tokio::time::sleep(Duration::from_millis(20)).await;
        debouncer.schedule(job(2));
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(*calls.lock(), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_cancels_and_blocks() {
        let debouncer = Debouncer::new(Duration::from_millis(10), Handle::current());
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = fired.clone();
        debouncer.schedule(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(debouncer.dispose());
        assert!(!debouncer.dispose());

        let counter = fired.clone();
        assert!(!debouncer.schedule(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_keeps_debouncer_usable() {
        let debouncer = Debouncer::new(Duration::from_millis(10), Handle::current());
        let (calls, job) = recorder();

        debouncer.schedule(job(1));
        assert!(debouncer.cancel());
        debouncer.schedule(job(2));
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(*calls.lock(), vec![2]);
    }
}
