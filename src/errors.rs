// src/errors.rs

//! Crate-wide error type.
//!
//! Structural and cycle errors are fatal and raised before any process is
//! spawned. Execution errors are scoped to one task and only end up here when
//! the run report is turned into a terminal result.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DagrunError {
    #[error("[FAIL] {0}")]
    Structural(String),

    #[error("[FAIL] detected circular dependency {0}")]
    Cycle(String),

    #[error("task '{task}' failed: {reason}")]
    Execution { task: String, reason: String },

    #[error(
        "task '{task}' command has {placeholders} placeholder(s) but {files} file(s)"
    )]
    PlaceholderMismatch {
        task: String,
        placeholders: usize,
        files: usize,
    },

    #[error("unable to write retry artifact {path:?}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failure (resumable dag stored in {})", artifact.display())]
    RunFailed { artifact: PathBuf },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DagrunError>;
