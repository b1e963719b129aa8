// src/engine/mod.rs

//! Execution engine for dagrun.
//!
//! The pure scheduling state machine lives in [`crate::dag::Scheduler`]; this
//! module is the async shell around it: a bounded work queue, a fixed pool of
//! workers, and the single lock that every completion goes through.

/// Canonical task name type used throughout the engine.
pub type TaskName = String;

/// Outcome of one dispatched task, as seen by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The command exited with status 0.
    Success,
    /// The task was marked successful without running (dry run or resumed).
    Skipped,
    /// The command could not run or exited non-zero.
    Failed(String),
}

pub mod runtime;

pub use runtime::Runtime;
