// src/dag/scheduler_step.rs

//! Step-by-step execution result types for the scheduler.

use crate::dag::task_info::ScheduledTask;
use crate::engine::TaskName;

/// Structured result of a single scheduler "step".
///
/// Useful for tests that drive the DAG by hand and assert on what changed.
#[derive(Debug, Clone, Default)]
pub struct SchedulerStep {
    /// Tasks that became ready as a result of this step, in declaration order.
    pub newly_ready: Vec<ScheduledTask>,
    /// Descendants newly withheld because the completed task failed.
    pub newly_withheld: Vec<TaskName>,
    /// Whether this step accounted for the last outstanding task.
    pub run_just_finished: bool,
}

/// Final accounting of a run. Every task appears in exactly one list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Tasks that ended `Succeeded`, including skipped ones.
    pub succeeded: Vec<TaskName>,
    /// Tasks whose command failed, with the cause.
    pub failed: Vec<(TaskName, String)>,
    /// Tasks never dispatched because an ancestor failed.
    pub withheld: Vec<TaskName>,
}

impl RunReport {
    /// A run succeeds iff no task that became ready ended without success.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len() + self.withheld.len()
    }
}
