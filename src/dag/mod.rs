// src/dag/mod.rs

//! DAG representation and scheduling.
//!
//! - [`graph`] holds index-based parent/child adjacency.
//! - [`loaded`] is a validated declaration plus per-task skip flags.
//! - [`scheduler`] contains the per-run state machine that decides
//!   which tasks are ready, and which are withheld after a failure.
//! - [`task_info`] provides task metadata and scheduled task types.
//! - [`scheduler_step`] defines step results and the final run report.
//! - [`state_manager`] applies readiness and failure propagation.

pub mod graph;
pub mod loaded;
pub mod scheduler;
pub mod scheduler_step;
pub mod state_manager;
pub mod task_info;

pub use graph::{DagGraph, TaskIndex};
pub use loaded::Dag;
pub use scheduler::Scheduler;
pub use scheduler_step::{RunReport, SchedulerStep};
pub use task_info::{RunState, ScheduledTask, TaskInfo};
