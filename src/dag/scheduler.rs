// src/dag/scheduler.rs

use tracing::{debug, info, warn};

use crate::dag::graph::{DagGraph, TaskIndex};
use crate::dag::loaded::Dag;
use crate::dag::scheduler_step::{RunReport, SchedulerStep};
use crate::dag::state_manager::{deps_satisfied, StateManager};
use crate::dag::task_info::{RunState, ScheduledTask, TaskInfo};
use crate::engine::TaskOutcome;

/// Scheduler holds the immutable DAG plus mutable per-run state.
///
/// It is responsible for:
/// - deciding when a task is ready (every parent succeeded)
/// - marking tasks as running/succeeded/failed
/// - releasing children once their last parent succeeds
/// - withholding every descendant of a failed task
/// - counting each task exactly once so the run is known to be finished
///
/// It performs no IO; the async worker pool in `engine::runtime` drives it.
#[derive(Debug)]
pub struct Scheduler {
    graph: DagGraph,
    tasks: Vec<TaskInfo>,
    /// Number of tasks in a terminal state.
    accounted: usize,
}

impl Scheduler {
    /// Construct a scheduler from a validated [`Dag`].
    pub fn new(dag: &Dag) -> Self {
        let tasks = dag
            .raw()
            .tasks
            .iter()
            .enumerate()
            .map(|(i, decl)| TaskInfo::from_decl(decl, dag.is_skipped(i)))
            .collect();

        Self {
            graph: dag.graph().clone(),
            tasks,
            accounted: 0,
        }
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Task names in declaration order.
    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.graph.tasks()
    }

    pub fn graph(&self) -> &DagGraph {
        &self.graph
    }

    /// Whether every task has been accounted for.
    pub fn is_finished(&self) -> bool {
        self.accounted == self.tasks.len()
    }

    pub fn run_state_of(&self, task: &str) -> Option<RunState> {
        let idx = self.graph.index_of(task)?;
        Some(self.tasks[idx].run_state)
    }

    /// Whether every parent of `task` has succeeded. `None` for unknown tasks.
    pub fn deps_satisfied(&self, task: &str) -> Option<bool> {
        let idx = self.graph.index_of(task)?;
        Some(deps_satisfied(&self.graph, &self.tasks, idx))
    }

    /// Per-task success flags in declaration order, as persisted in retry
    /// artifacts.
    pub fn succeeded_flags(&self) -> Vec<bool> {
        self.tasks
            .iter()
            .map(|t| t.run_state == RunState::Succeeded)
            .collect()
    }

    /// Tasks that are ready at the start of the run (those with no parents).
    pub fn initial_ready(&mut self) -> Vec<ScheduledTask> {
        let roots: Vec<TaskIndex> = self.graph.roots().collect();
        let mut manager = StateManager::new(&self.graph, &mut self.tasks);
        let ready = manager.promote_ready(roots);
        debug!(count = ready.len(), "initial ready tasks");
        ready
    }

    /// Record that a worker handed `task` to the executor.
    pub fn mark_running(&mut self, task: TaskIndex) {
        let info = &mut self.tasks[task];
        if info.run_state == RunState::Ready {
            info.run_state = RunState::Running;
        } else {
            warn!(task = %info.name, state = ?info.run_state, "mark_running on a task that is not Ready");
        }
    }

    /// Handle the outcome of a dispatched task.
    ///
    /// On success the task is marked `Succeeded` and every child whose parents
    /// have now all succeeded becomes ready. On failure every transitive
    /// descendant still pending is withheld. Outcomes for tasks that are not
    /// `Ready` or `Running` are ignored so accounting stays exact.
    pub fn handle_completion(&mut self, task: TaskIndex, outcome: &TaskOutcome) -> SchedulerStep {
        let mut step = SchedulerStep::default();

        let Some(info) = self.tasks.get_mut(task) else {
            warn!(task, "completion for unknown task index; ignoring");
            return step;
        };

        if !matches!(info.run_state, RunState::Ready | RunState::Running) {
            warn!(
                task = %info.name,
                state = ?info.run_state,
                "completion for a task that was not dispatched; ignoring"
            );
            return step;
        }

        match outcome {
            TaskOutcome::Success | TaskOutcome::Skipped => {
                info.run_state = RunState::Succeeded;
                self.accounted += 1;
                debug!(task = %info.name, ?outcome, "task succeeded");

                let children = self.graph.children(task).to_vec();
                let mut manager = StateManager::new(&self.graph, &mut self.tasks);
                step.newly_ready = manager.promote_ready(children);
            }
            TaskOutcome::Failed(reason) => {
                info.run_state = RunState::Failed;
                info.failure = Some(reason.clone());
                self.accounted += 1;
                warn!(task = %info.name, "task failed; withholding dependents in this run");

                let mut manager = StateManager::new(&self.graph, &mut self.tasks);
                let withheld = manager.withhold_descendants(task);
                self.accounted += withheld.len();
                step.newly_withheld = withheld
                    .into_iter()
                    .map(|i| self.tasks[i].name.clone())
                    .collect();
            }
        }

        step.run_just_finished = self.is_finished();
        if step.run_just_finished {
            info!(tasks = self.tasks.len(), "scheduler: all tasks accounted for");
        }

        step
    }

    /// Final accounting, in declaration order.
    ///
    /// Tasks that never left `Pending`/`Ready`/`Running` (only possible if the
    /// run was abandoned) are reported as withheld.
    pub fn report(&self) -> RunReport {
        let mut report = RunReport::default();

        for info in &self.tasks {
            match info.run_state {
                RunState::Succeeded => report.succeeded.push(info.name.clone()),
                RunState::Failed => report.failed.push((
                    info.name.clone(),
                    info.failure.clone().unwrap_or_default(),
                )),
                RunState::Withheld
                | RunState::Pending
                | RunState::Ready
                | RunState::Running => report.withheld.push(info.name.clone()),
            }
        }

        report
    }
}
