//! Concurrent scheduler for independently-cadenced jobs
//!
//! Every registered job runs in its own tokio task on its own timer, so a
//! slow or failing job never delays another one. Within a job executions are
//! single-flight: the next tick waits for the previous execution to finish.
//!
//! Failures (errors and panics) are logged and the job keeps ticking. The
//! only way a job ends is the shared [`CancellationToken`] being cancelled,
//! which [`Scheduler::wait`] does when its shutdown future resolves.

mod options;

pub use options::PeriodicTaskOptions;

use std::future::Future;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, trace, warn};

/// Owner of all scheduled jobs of a process
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    tracker: TaskTracker,
    shutdown: CancellationToken,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scheduler whose jobs stop when `shutdown` is cancelled
    #[must_use]
    pub fn with_cancellation(shutdown: CancellationToken) -> Self {
        Self {
            tracker: TaskTracker::new(),
            shutdown,
        }
    }

    /// Register a repeating job and start it right away
    ///
    /// Without options the job runs every 30s, first execution after one
    /// interval. Never blocks the caller.
    pub fn register<F, Fut>(
        &self,
        name: &'static str,
        options: Option<PeriodicTaskOptions>,
        action: F,
    ) where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let options = match options {
            Some(options) => options.sanitized(name),
            None => {
                warn!(job = name, "Periodic task options missing, using default values");
                PeriodicTaskOptions::default()
            }
        };

        let shutdown = self.shutdown.clone();
        self.tracker.spawn(run_periodic(name, options, action, shutdown));
    }

    /// Start a one-shot supervised task
    ///
    /// The task receives the shutdown token and is expected to return once it
    /// is cancelled. An error is logged, never propagated.
    pub fn spawn<F, Fut>(&self, name: &'static str, action: F)
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let task = action(self.shutdown.clone());
        self.tracker.spawn(async move {
            match task.await {
                Ok(()) => debug!(job = name, "Task finished"),
                Err(e) => error!(job = name, error = %format!("{e:#}"), "Task failed"),
            }
        });
    }

    /// Number of jobs that have not ended yet
    #[must_use]
    pub fn running(&self) -> usize {
        self.tracker.len()
    }

    /// Signal every job to stop after its current execution
    pub fn cancel(&self) {
        self.shutdown.cancel();
    }

    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Block until every job has ended
    ///
    /// Jobs loop until cancelled, so this normally returns only after
    /// `shutdown` resolves (or the token is cancelled elsewhere) and each
    /// job has observed the cancellation.
    pub async fn wait<S>(&self, shutdown: S)
    where
        S: Future<Output = ()>,
    {
        self.tracker.close();

        tokio::select! {
            () = self.tracker.wait() => return,
            () = shutdown => {
                info!(jobs = self.running(), "Shutdown requested, stopping scheduled jobs");
                self.shutdown.cancel();
            }
            () = self.shutdown.cancelled() => {}
        }

        self.tracker.wait().await;
        debug!("All scheduled jobs stopped");
    }
}

async fn run_periodic<F, Fut>(
    name: &'static str,
    options: PeriodicTaskOptions,
    action: F,
    shutdown: CancellationToken,
) where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    debug!(
        job = name,
        interval_secs = options.interval.as_secs_f64(),
        run_immediately = options.run_immediately,
        "Job registered"
    );

    let mut ticker = time::interval_at(Instant::now() + options.interval, options.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    if options.run_immediately && !execute(name, &action, &shutdown).await {
        return;
    }

    loop {
        tokio::select! {
            biased;
            () = shutdown.cancelled() => break,
            _ = ticker.tick() => {
                if !execute(name, &action, &shutdown).await {
                    break;
                }
            }
        }
    }

    debug!(job = name, "Job stopped");
}

/// Run one execution in its own task so a panic stays contained
///
/// Returns false if shutdown interrupted the execution.
async fn execute<F, Fut>(name: &'static str, action: &F, shutdown: &CancellationToken) -> bool
where
    F: Fn() -> Fut,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    let mut handle = tokio::spawn(action());

    tokio::select! {
        biased;
        () = shutdown.cancelled() => {
            handle.abort();
            debug!(job = name, "Execution aborted by shutdown");
            false
        }
        joined = &mut handle => {
            match joined {
                Ok(Ok(())) => trace!(job = name, "Execution succeeded"),
                Ok(Err(e)) => error!(job = name, error = %format!("{e:#}"), "Execution failed"),
                Err(e) if e.is_panic() => error!(job = name, "Execution panicked"),
                Err(e) => error!(job = name, error = %e, "Execution did not complete"),
            }
            true
        }
    }
}
