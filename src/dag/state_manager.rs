// src/dag/state_manager.rs

//! Per-run state transitions for tasks in the scheduler.

use tracing::{debug, warn};

use crate::dag::graph::{DagGraph, TaskIndex};
use crate::dag::task_info::{RunState, ScheduledTask, TaskInfo};

/// Applies readiness and failure propagation to the task table.
///
/// Every transition into a terminal state goes through here so that the
/// caller can count each task exactly once.
pub struct StateManager<'a> {
    graph: &'a DagGraph,
    tasks: &'a mut [TaskInfo],
}

impl<'a> StateManager<'a> {
    pub fn new(graph: &'a DagGraph, tasks: &'a mut [TaskInfo]) -> Self {
        Self { graph, tasks }
    }

    /// Whether every parent of `task` has succeeded in this run.
    pub fn deps_satisfied(&self, task: TaskIndex) -> bool {
        deps_satisfied(self.graph, self.tasks, task)
    }

    /// Move `Pending` tasks among `candidates` whose parents have all
    /// succeeded to `Ready`, preserving candidate order.
    pub fn promote_ready(
        &mut self,
        candidates: impl IntoIterator<Item = TaskIndex>,
    ) -> Vec<ScheduledTask> {
        let mut ready = Vec::new();

        for idx in candidates {
            if self.tasks[idx].run_state != RunState::Pending || !self.deps_satisfied(idx) {
                continue;
            }

            let info = &mut self.tasks[idx];
            info.run_state = RunState::Ready;
            debug!(task = %info.name, skip = info.skip, "dependencies satisfied; marking Ready");
            ready.push(ScheduledTask::from_task_info(idx, info));
        }

        ready
    }

    /// Mark every transitive descendant of a failed task as `Withheld`.
    ///
    /// Returns the tasks that were newly withheld. A task reachable from
    /// several failed ancestors is only returned by the first call.
    pub fn withhold_descendants(&mut self, failed: TaskIndex) -> Vec<TaskIndex> {
        let mut withheld = Vec::new();

        for idx in self.graph.descendants(failed) {
            let info = &mut self.tasks[idx];
            match info.run_state {
                RunState::Pending => {
                    info.run_state = RunState::Withheld;
                    debug!(
                        task = %info.name,
                        "marking dependent as Withheld due to upstream failure"
                    );
                    withheld.push(idx);
                }
                RunState::Withheld => {
                    // Already accounted for through another failed ancestor.
                }
                other => {
                    warn!(
                        task = %info.name,
                        state = ?other,
                        "descendant of a failed task was not pending"
                    );
                }
            }
        }

        withheld.sort_unstable();
        withheld
    }
}

pub(crate) fn deps_satisfied(graph: &DagGraph, tasks: &[TaskInfo], task: TaskIndex) -> bool {
    graph
        .parents(task)
        .iter()
        .all(|&p| tasks[p].run_state == RunState::Succeeded)
}
