//! Core rate gate implementation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

use crate::error::{DocgateError, Result};

/// The outcome of an admission attempt.
#[derive(Debug)]
pub enum Admission {
    /// Window capacity and a concurrency permit were both reserved.
    Admitted(Permit),
    /// The window quota is exhausted; the caller may retry after the window
    /// elapses. Returned immediately, without waiting.
    Rejected,
    /// The wait for a concurrency permit was interrupted by shutdown.
    Cancelled,
}

/// A token representing one unit of concurrency capacity.
///
/// The permit is returned to the gate when this token is dropped, so the
/// release happens on every exit path of the protected section.
#[derive(Debug)]
#[must_use = "dropping the permit immediately releases the concurrency slot"]
pub struct Permit {
    _permit: OwnedSemaphorePermit,
}

/// The combined quota and concurrency limiter guarding access to the remote
/// call.
///
/// A gate admits at most `quota` calls per window and at most
/// `max_concurrency` calls in flight at once. It is thread-safe and can be
/// shared across multiple tasks. The window-reset timer is owned by the gate
/// and stopped exactly once by [`RateGate::shutdown`] (or on drop).
pub struct RateGate {
    /// Maximum admissions per window
    quota: u64,
    /// Maximum simultaneous in-flight calls
    max_concurrency: usize,
    /// Calls admitted since the last window reset
    issued: Arc<AtomicU64>,
    /// Concurrency permits
    semaphore: Arc<Semaphore>,
    /// Window-reset timer task; `None` once shut down
    reset_task: Mutex<Option<JoinHandle<()>>>,
}

impl RateGate {
    /// Create a new gate and start its window-reset timer.
    ///
    /// Must be called from within a tokio runtime. Fails with
    /// [`DocgateError::Config`] if `quota`, `max_concurrency`, or `window`
    /// is zero, or if `max_concurrency` exceeds the semaphore's permit bound.
    pub fn new(quota: u64, max_concurrency: usize, window: Duration) -> Result<Self> {
        if quota == 0 {
            return Err(DocgateError::Config(
                "window quota must be greater than zero".to_string(),
            ));
        }
        if max_concurrency == 0 {
            return Err(DocgateError::Config(
                "concurrency ceiling must be greater than zero".to_string(),
            ));
        }
        // Semaphore::new panics above this bound; surface it as a config error.
        if max_concurrency > Semaphore::MAX_PERMITS {
            return Err(DocgateError::Config(format!(
                "concurrency ceiling must not exceed {}",
                Semaphore::MAX_PERMITS
            )));
        }
        if window.is_zero() {
            return Err(DocgateError::Config(
                "window duration must be greater than zero".to_string(),
            ));
        }

        let issued = Arc::new(AtomicU64::new(0));
        let reset_task = {
            let issued = Arc::clone(&issued);
            tokio::spawn(async move {
                let start = tokio::time::Instant::now() + window;
                let mut ticker = tokio::time::interval_at(start, window);
                loop {
                    ticker.tick().await;
                    issued.store(0, Ordering::SeqCst);
                    trace!("window elapsed, quota replenished");
                }
            })
        };

        debug!(
            quota,
            max_concurrency,
            window_secs = window.as_secs_f64(),
            "Rate gate created"
        );

        Ok(Self {
            quota,
            max_concurrency,
            issued,
            semaphore: Arc::new(Semaphore::new(max_concurrency)),
            reset_task: Mutex::new(Some(reset_task)),
        })
    }

    /// Attempt to reserve one unit of window capacity and one concurrency
    /// permit.
    ///
    /// If the window quota is already exhausted this returns
    /// [`Admission::Rejected`] immediately, without waiting. Otherwise the
    /// caller suspends until a concurrency permit is free. Dropping the
    /// future while waiting leaves the gate untouched.
    pub async fn acquire(&self) -> Admission {
        if self.issued.load(Ordering::SeqCst) >= self.quota {
            debug!(quota = self.quota, "Window quota exhausted, rejecting");
            return Admission::Rejected;
        }

        let permit = match Arc::clone(&self.semaphore).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                debug!("Gate shut down while waiting for a permit");
                return Admission::Cancelled;
            }
        };

        // Re-validate under the held permit: a concurrent acquirer may have
        // consumed the last window slot during the wait.
        let quota = self.quota;
        match self
            .issued
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |issued| {
                (issued < quota).then_some(issued + 1)
            }) {
            Ok(previous) => {
                trace!(issued = previous + 1, "Admission granted");
                Admission::Admitted(Permit { _permit: permit })
            }
            Err(_) => {
                debug!(quota, "Window quota exhausted, rejecting");
                Admission::Rejected
            }
        }
    }

    /// Stop the window-reset timer and cancel any waiters.
    ///
    /// Idempotent. In-flight calls keep their permits and complete normally;
    /// subsequent acquirers that reach the permit wait observe
    /// [`Admission::Cancelled`].
    pub fn shutdown(&self) {
        if let Some(task) = self.reset_task.lock().take() {
            task.abort();
            self.semaphore.close();
            info!("Rate gate shut down");
        }
    }

    /// Calls admitted since the last window reset.
    pub fn issued_in_window(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    /// Concurrency permits currently held.
    pub fn outstanding(&self) -> usize {
        self.max_concurrency - self.semaphore.available_permits()
    }

    /// The window quota this gate was constructed with.
    pub fn quota(&self) -> u64 {
        self.quota
    }

    /// The concurrency ceiling this gate was constructed with.
    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }
}

impl Drop for RateGate {
    fn drop(&mut self) {
        self.shutdown();
    }
}
