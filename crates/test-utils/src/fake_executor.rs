use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use dagrun::dag::ScheduledTask;
use dagrun::errors::{DagrunError, Result};
use dagrun::exec::TaskExecutor;

/// A fake executor that:
/// - records which tasks were "run", in dispatch order
/// - resolves the command like the real executor, so placeholder mismatches
///   still fail the task
/// - fails the tasks named in `failing`, succeeds everything else
#[derive(Clone, Default)]
pub struct FakeExecutor {
    executed: Arc<Mutex<Vec<String>>>,
    failing: Arc<HashSet<String>>,
    delay: Option<Duration>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, tasks: &[&str]) -> Self {
        self.failing = Arc::new(tasks.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Sleep this long inside every task, to let workers overlap.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Names of tasks executed so far. Clones share the same record.
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

impl TaskExecutor for FakeExecutor {
    fn execute<'a>(
        &'a self,
        task: &'a ScheduledTask,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            self.executed.lock().unwrap().push(task.name.clone());
            task.command()?;

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            if self.failing.contains(&task.name) {
                return Err(DagrunError::Execution {
                    task: task.name.clone(),
                    reason: "simulated failure".to_string(),
                });
            }
            Ok(())
        })
    }
}
