// src/dag/task_info.rs

//! Task metadata and per-run state.

use crate::config::model::TaskDecl;
use crate::dag::graph::TaskIndex;
use crate::engine::TaskName;
use crate::errors::Result;
use crate::exec::command::resolve_command;

/// Per-run state of a task.
///
/// `Pending -> Ready -> Running -> {Succeeded | Failed}`, or
/// `Ready -> Succeeded` for skipped tasks, or `Pending -> Withheld` when an
/// ancestor failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Waiting on at least one parent.
    Pending,
    /// All parents succeeded; queued for a worker.
    Ready,
    /// Handed to the executor.
    Running,
    Succeeded,
    Failed,
    /// Never dispatched because an ancestor failed.
    Withheld,
}

impl RunState {
    /// Whether the task has been accounted for in this run.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunState::Succeeded | RunState::Failed | RunState::Withheld
        )
    }
}

/// Static task information from the declaration, plus per-run state.
#[derive(Debug, Clone)]
pub struct TaskInfo {
    pub name: TaskName,
    pub cmd: String,
    pub files: Vec<String>,
    /// Treat as already successful without running the command.
    pub skip: bool,
    pub run_state: RunState,
    /// Cause of failure, when `run_state` is `Failed`.
    pub failure: Option<String>,
}

impl TaskInfo {
    pub fn from_decl(decl: &TaskDecl, skip: bool) -> Self {
        Self {
            name: decl.name.clone(),
            cmd: decl.cmd.clone(),
            files: decl.files.clone(),
            skip,
            run_state: RunState::Pending,
            failure: None,
        }
    }
}

/// A task the scheduler wants a worker to handle now.
#[derive(Debug, Clone)]
pub struct ScheduledTask {
    pub index: TaskIndex,
    pub name: TaskName,
    pub cmd: String,
    pub files: Vec<String>,
    pub skip: bool,
}

impl ScheduledTask {
    pub fn from_task_info(index: TaskIndex, info: &TaskInfo) -> Self {
        Self {
            index,
            name: info.name.clone(),
            cmd: info.cmd.clone(),
            files: info.files.clone(),
            skip: info.skip,
        }
    }

    /// The command with every placeholder replaced by its file.
    pub fn command(&self) -> Result<String> {
        resolve_command(&self.name, &self.cmd, &self.files)
    }

    /// Resolved command for log lines; falls back to the raw template.
    pub fn display_command(&self) -> String {
        self.command().unwrap_or_else(|_| self.cmd.clone())
    }
}
