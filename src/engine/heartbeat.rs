//! Heartbeat scheduler (spec §4.5, the "Heartbeat Scheduler" / C5).
//!
//! On BootNotification acceptance the server returns an `interval` in
//! seconds; the scheduler cancels any prior timer and installs a new
//! periodic trigger at that interval. Heartbeat CALLs are independent of
//! other traffic — no cross-call ordering guarantee (spec §5). On
//! disconnect, the timer is cancelled.
//!
//! Grounded on the teacher's `support::shutdown` task-spawning style (a
//! `tokio::spawn`'d loop selecting on a cancellation signal) rather than a
//! literal port of anything heartbeat-specific, since the teacher is a
//! Central System and never originates its own Heartbeat CALLs.

use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::debug;

/// Owns the currently-armed heartbeat timer task, if any.
pub struct HeartbeatScheduler {
    handle: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl HeartbeatScheduler {
    pub fn new() -> Self {
        Self {
            handle: std::sync::Mutex::new(None),
        }
    }

    /// Cancel any prior timer and install a new one that calls `on_fire`
    /// every `interval_secs` seconds. `on_fire` is expected to itself spawn
    /// or be cheap — it runs on the scheduler's own task.
    pub fn arm<F, Fut>(&self, interval_secs: u64, on_fire: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        if interval_secs == 0 {
            debug!("heartbeat interval of 0 received; not arming a timer");
            return;
        }

        let interval = Duration::from_secs(interval_secs);

        // `abort()` on cancel/re-arm is sufficient cancellation: a
        // heartbeat send never holds a lock or half-applies state across
        // an await point, so killing the task outright is safe.
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // first tick fires immediately; skip it
            loop {
                ticker.tick().await;
                on_fire().await;
            }
        });

        *self.handle.lock().unwrap() = Some(handle);
    }

    /// Cancel the current timer, if any (spec §4.5: "on disconnect, the
    /// timer is cancelled").
    pub fn cancel(&self) {
        if let Some(handle) = self.handle.lock().unwrap().take() {
            handle.abort();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.handle.lock().unwrap().is_some()
    }
}

impl Default for HeartbeatScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for HeartbeatScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn arming_fires_periodically() {
        let scheduler = HeartbeatScheduler::new();
        let count = Arc::new(AtomicU32::new(0));
        let count_clone = count.clone();

        scheduler.arm(1, move || {
            let count = count_clone.clone();
            async move {
                count.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::advance(Duration::from_secs(3)).await;
        tokio::task::yield_now().await;

        assert!(count.load(Ordering::SeqCst) >= 2);
    }

    #[test]
    fn cancel_is_idempotent() {
        let scheduler = HeartbeatScheduler::new();
        scheduler.cancel();
        scheduler.cancel();
        assert!(!scheduler.is_armed());
    }
}
