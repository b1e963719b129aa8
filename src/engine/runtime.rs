// src/engine/runtime.rs

use std::fmt;
use std::sync::Arc;

use anyhow::anyhow;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::dag::{ScheduledTask, Scheduler};
use crate::errors::{DagrunError, Result};
use crate::exec::TaskExecutor;

use super::TaskOutcome;

/// State shared by all workers, behind one lock.
///
/// Marking a task done, computing which children became ready and pushing
/// them onto the queue all happen in the same critical section, so readiness
/// and enqueue never race.
struct Shared {
    scheduler: Scheduler,
    /// Producer side of the work queue. Dropped once every task is accounted
    /// for, which lets idle workers observe the closed queue and exit.
    queue: Option<mpsc::Sender<ScheduledTask>>,
}

impl Shared {
    fn enqueue(&mut self, tasks: Vec<ScheduledTask>) -> Result<()> {
        let Some(queue) = &self.queue else {
            return Ok(());
        };
        for task in tasks {
            debug!(task = %task.name, "enqueueing ready task");
            if let Err(err) = queue.try_send(task) {
                // Capacity equals the task count and every task is enqueued at
                // most once, so this only fails if the receiver is gone.
                self.queue = None;
                return Err(DagrunError::Other(anyhow!("work queue rejected task: {err}")));
            }
        }
        Ok(())
    }
}

/// Fixed-size worker pool that executes a [`Scheduler`] to completion.
///
/// Workers pull from a bounded queue sized to the task count, so producers
/// never block on enqueue. A worker blocks only on the queue and on the task
/// it is executing. Running processes are never interrupted: after a failure
/// the descendants are withheld by the scheduler and simply never enqueued.
pub struct Runtime<E: TaskExecutor> {
    scheduler: Scheduler,
    executor: Arc<E>,
    workers: usize,
}

impl<E: TaskExecutor> fmt::Debug for Runtime<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("scheduler", &self.scheduler)
            .field("workers", &self.workers)
            .finish_non_exhaustive()
    }
}

impl<E: TaskExecutor + 'static> Runtime<E> {
    pub fn new(scheduler: Scheduler, executor: E, workers: usize) -> Self {
        Self {
            scheduler,
            executor: Arc::new(executor),
            workers: workers.max(1),
        }
    }

    /// Run every task and return the scheduler in its final state.
    ///
    /// Task failures are not errors here; they are recorded in the
    /// scheduler's [`RunReport`](crate::dag::RunReport). An `Err` means the
    /// engine itself broke (a worker panicked, or nothing could ever start).
    pub async fn run(self) -> Result<Scheduler> {
        let Runtime {
            mut scheduler,
            executor,
            workers,
        } = self;

        let capacity = scheduler.task_count().max(1);
        let (tx, rx) = mpsc::channel::<ScheduledTask>(capacity);

        let initial = scheduler.initial_ready();
        if initial.is_empty() && !scheduler.is_finished() {
            return Err(DagrunError::Other(anyhow!(
                "no task is ready to start; the dependency graph cannot make progress"
            )));
        }

        let queue = (!scheduler.is_finished()).then_some(tx);
        let mut shared = Shared { scheduler, queue };
        shared.enqueue(initial)?;

        info!(workers, tasks = capacity, "starting workers");

        let shared = Arc::new(Mutex::new(shared));
        let rx = Arc::new(Mutex::new(rx));

        let mut pool = JoinSet::new();
        for id in 0..workers {
            pool.spawn(worker_loop(
                id,
                Arc::clone(&shared),
                Arc::clone(&rx),
                Arc::clone(&executor),
            ));
        }

        let mut first_err = None;
        while let Some(joined) = pool.join_next().await {
            let res = joined.map_err(|e| DagrunError::Other(e.into())).and_then(|r| r);
            if let Err(err) = res {
                error!(error = %err, "worker stopped with an error");
                // Close the queue so the remaining workers wind down.
                shared.lock().await.queue = None;
                first_err.get_or_insert(err);
            }
        }
        if let Some(err) = first_err {
            return Err(err);
        }

        drop(rx);
        let shared = Arc::try_unwrap(shared)
            .map_err(|_| DagrunError::Other(anyhow!("worker state still shared after join")))?;
        Ok(shared.into_inner().scheduler)
    }
}

async fn worker_loop<E: TaskExecutor>(
    worker: usize,
    shared: Arc<Mutex<Shared>>,
    rx: Arc<Mutex<mpsc::Receiver<ScheduledTask>>>,
    executor: Arc<E>,
) -> Result<()> {
    debug!(worker, "worker started");

    loop {
        let next = {
            let mut rx = rx.lock().await;
            rx.recv().await
        };
        let Some(task) = next else {
            debug!(worker, "queue closed; worker exiting");
            return Ok(());
        };

        let outcome = if task.skip {
            info!("[SKIPPED] {} ({})", task.name, task.display_command());
            TaskOutcome::Skipped
        } else {
            shared.lock().await.scheduler.mark_running(task.index);
            info!("[RUNNING] {} ({})", task.name, task.display_command());
            match executor.execute(&task).await {
                Ok(()) => {
                    info!("[SUCCESS] {}", task.name);
                    TaskOutcome::Success
                }
                Err(err) => {
                    // Execution errors already name the task.
                    let reason = match err {
                        DagrunError::Execution { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    error!("[ERROR] {}: {}", task.name, reason);
                    TaskOutcome::Failed(reason)
                }
            }
        };

        let mut guard = shared.lock().await;
        let step = guard.scheduler.handle_completion(task.index, &outcome);
        for name in &step.newly_withheld {
            debug!("[WITHHELD] {} (upstream '{}' failed)", name, task.name);
        }
        guard.enqueue(step.newly_ready)?;
        if step.run_just_finished {
            guard.queue = None;
        }
    }
}
