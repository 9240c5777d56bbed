//! Cancellable trailing-edge timer.

use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Runs an action once a quiet window has elapsed since the last call to
/// [`Debouncer::schedule`].
///
/// Scheduling replaces: the previously pending timer, if any, is aborted
/// before the new one starts. Once the window elapses the action is polled
/// to completion on the timer task; an action that must survive a later
/// `schedule` should spawn its own work and return.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: Mutex::new(None),
        }
    }

    /// Arms the timer with `action`, cancelling whatever was armed before.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F>(&self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let window = self.window;
        // Spawn and swap under one lock: the surviving timer is the last armed.
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            action.await;
        });
        if let Some(previous) = pending.replace(handle) {
            previous.abort();
        }
    }

    /// Disarms the timer. Returns `true` if an action was still waiting.
    pub fn cancel(&self) -> bool {
        let pending = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match pending {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    /// `true` while an armed timer has not yet finished.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(handle) = self
            .pending
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    fn counter_action(counter: &Arc<AtomicU32>, value: u32) -> impl Future<Output = ()> + Send {
        let counter = Arc::clone(counter);
        async move {
            counter.store(value, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_after_quiet_window() {
        let fired = Arc::new(AtomicU32::new(0));
        let debouncer = Debouncer::new(Duration::from_millis(500));

        debouncer.schedule(counter_action(&fired, 1));
        tokio::time::sleep(Duration::from_millis(499)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn rescheduling_replaces_pending_action() {
        let value = Arc::new(AtomicU32::new(0));
        let debouncer = Debouncer::new(Duration::from_millis(500));

        for v in 1..=5 {
            debouncer.schedule(counter_action(&value, v));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        // 100ms after the last schedule: nothing yet.
        assert_eq!(value.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(value.load(Ordering::SeqCst), 5, "only the last action runs");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_schedules_leave_exactly_one_timer() {
        let fired = Arc::new(AtomicU32::new(0));
        let debouncer = Arc::new(Debouncer::new(Duration::from_millis(500)));

        let callers: Vec<_> = (0..16)
            .map(|_| {
                let debouncer = Arc::clone(&debouncer);
                let fired = Arc::clone(&fired);
                tokio::spawn(async move {
                    debouncer.schedule(async move {
                        fired.fetch_add(1, Ordering::SeqCst);
                    });
                })
            })
            .collect();
        for caller in callers {
            caller.await.unwrap();
        }

        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_disarms_timer() {
        let fired = Arc::new(AtomicU32::new(0));
        let debouncer = Debouncer::new(Duration::from_millis(500));

        debouncer.schedule(counter_action(&fired, 1));
        assert!(debouncer.cancel());
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(!debouncer.cancel(), "nothing left to cancel");
    }
}
