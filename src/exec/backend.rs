// src/exec/backend.rs

//! Pluggable executor abstraction.
//!
//! Workers hand each ready, non-skipped task to a `TaskExecutor`. Production
//! uses [`ProcessExecutor`], which spawns the command as a child process;
//! tests provide their own implementation that records dispatches and
//! decides outcomes without touching the OS.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use crate::dag::ScheduledTask;
use crate::errors::Result;

use super::task_runner::run_task;

/// Trait abstracting how a single task is executed.
pub trait TaskExecutor: Send + Sync {
    /// Run `task` to completion. `Ok(())` means success; any error is that
    /// task's failure and is recorded with its message.
    fn execute<'a>(
        &'a self,
        task: &'a ScheduledTask,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

/// Real executor: runs each task as a child process in `work_dir`.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    work_dir: PathBuf,
}

impl ProcessExecutor {
    /// `work_dir` is normally the directory holding the declaration, so that
    /// relative file paths in commands resolve the same way validation did.
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }
}

impl TaskExecutor for ProcessExecutor {
    fn execute<'a>(
        &'a self,
        task: &'a ScheduledTask,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(run_task(task, &self.work_dir))
    }
}
