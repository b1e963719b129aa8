// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`command`] resolves `%s` placeholders and splits the command line.
//! - [`task_runner`] spawns one task's process and drains its output.
//! - [`backend`] provides the `TaskExecutor` trait and the production
//!   `ProcessExecutor`; tests swap in a fake.

pub mod backend;
pub mod command;
pub mod task_runner;

pub use backend::{ProcessExecutor, TaskExecutor};
pub use command::{count_placeholders, resolve_command, split_command};
