//! Scheduler for bounding how many units of work run at once
//!
//! This module handles:
//! - Global concurrency limiting via a fair semaphore
//! - Submission of new work from inside running work
//! - Detecting when every submitted unit has finished
//! - Shutting down on the first fatal error

use crate::PressError;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{watch, Semaphore};
use tokio::task::JoinHandle;

/// Scheduler admits at most `limit` units of work at a time
///
/// Units wait for a permit in submission order. The number of outstanding
/// units (queued or running) is published on a watch channel; it is raised
/// inside `submit`, before the submitting unit can finish, so it only reaches
/// zero once the whole tree of work is done.
///
/// Cloning is cheap and every clone drives the same queue.
#[derive(Debug, Clone)]
pub struct Scheduler {
    /// Maximum number of units executing at once
    limit: usize,

    /// Global semaphore for limiting concurrent units
    permits: Arc<Semaphore>,

    /// Units submitted and not yet finished
    outstanding: Arc<watch::Sender<usize>>,

    /// Units currently holding a permit
    running: Arc<AtomicUsize>,

    /// Highest value `running` has reached
    peak_running: Arc<AtomicUsize>,

    /// First fatal error reported by a unit
    failure: Arc<Mutex<Option<PressError>>>,
}

/// Decrements the outstanding count when a unit is done, however it ends
struct Ticket {
    outstanding: Arc<watch::Sender<usize>>,
}

impl Drop for Ticket {
    fn drop(&mut self) {
        self.outstanding.send_modify(|count| *count -= 1);
    }
}

/// Tracks the running count for the lifetime of one admitted unit
struct RunningGuard {
    running: Arc<AtomicUsize>,
}

impl RunningGuard {
    fn enter(running: &Arc<AtomicUsize>, peak: &AtomicUsize) -> Self {
        let now = running.fetch_add(1, Ordering::SeqCst) + 1;
        peak.fetch_max(now, Ordering::SeqCst);
        Self {
            running: Arc::clone(running),
        }
    }
}

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.running.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Scheduler {
    /// Creates a scheduler admitting at most `limit` units at once
    ///
    /// A limit of zero is raised to one.
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        let (outstanding, _) = watch::channel(0usize);

        Self {
            limit,
            permits: Arc::new(Semaphore::new(limit)),
            outstanding: Arc::new(outstanding),
            running: Arc::new(AtomicUsize::new(0)),
            peak_running: Arc::new(AtomicUsize::new(0)),
            failure: Arc::new(Mutex::new(None)),
        }
    }

    /// Submits a unit of work
    ///
    /// The unit runs once a permit is free. May be called from inside a
    /// running unit. A unit that returns `Err` shuts the scheduler down:
    /// units still waiting for a permit are dropped without running, and
    /// the error is returned from [`Scheduler::wait_idle`].
    pub fn submit<F>(&self, work: F) -> JoinHandle<()>
    where
        F: Future<Output = Result<(), PressError>> + Send + 'static,
    {
        self.outstanding.send_modify(|count| *count += 1);
        let ticket = Ticket {
            outstanding: Arc::clone(&self.outstanding),
        };
        let scheduler = self.clone();

        tokio::spawn(async move {
            let _ticket = ticket;
            let _permit = match Arc::clone(&scheduler.permits).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    tracing::trace!("Scheduler closed, dropping queued unit");
                    return;
                }
            };
            let _running = RunningGuard::enter(&scheduler.running, &scheduler.peak_running);

            if let Err(e) = work.await {
                scheduler.fail(e);
            }
        })
    }

    /// Records a fatal error and stops admitting work
    ///
    /// Only the first error is kept.
    pub fn fail(&self, error: PressError) {
        tracing::error!("Fatal crawl error: {}", error);
        {
            let mut failure = self
                .failure
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if failure.is_none() {
                *failure = Some(error);
            }
        }
        self.permits.close();
    }

    /// Waits until every submitted unit has finished
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Quiescent, no unit failed fatally
    /// * `Err(PressError)` - The first fatal error reported by a unit
    pub async fn wait_idle(&self) -> Result<(), PressError> {
        let mut idle = self.outstanding.subscribe();
        idle.wait_for(|count| *count == 0)
            .await
            .map_err(|_| PressError::SchedulerClosed)?;

        let failure = self
            .failure
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// The concurrency limit
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Units queued or running
    pub fn outstanding(&self) -> usize {
        *self.outstanding.borrow()
    }

    /// Units currently running
    pub fn running(&self) -> usize {
        self.running.load(Ordering::SeqCst)
    }

    /// Highest number of units that ran at the same time
    pub fn peak_running(&self) -> usize {
        self.peak_running.load(Ordering::SeqCst)
    }

    /// Returns true once a fatal error has shut the scheduler down
    pub fn is_closed(&self) -> bool {
        self.permits.is_closed()
    }
}
