// src/types.rs

use std::num::NonZeroUsize;

use crate::errors::{DagrunError, Result};

/// What an invocation should do with the declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Validate and execute.
    #[default]
    Run,
    /// Print the dot graph and exit without validating or executing.
    Dot,
}

/// Options for one invocation, built once and passed into [`crate::run_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub mode: Mode,
    /// Size of the worker pool.
    pub workers: usize,
    /// Validate and walk the DAG, marking every task skipped.
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Run,
            workers: default_workers(),
            dry_run: false,
        }
    }
}

impl RunOptions {
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(DagrunError::Config(
                "workers must be >= 1 (got 0)".to_string(),
            ));
        }
        Ok(())
    }
}

/// Host CPU count, or 1 if it cannot be determined.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}
