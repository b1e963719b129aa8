// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod dot;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod persist;
pub mod types;

use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::cli::CliArgs;
use crate::config::{declaration_dir, load_from_path, validate};
use crate::dag::{RunReport, Scheduler};
use crate::engine::Runtime;
use crate::errors::{DagrunError, Result};
use crate::exec::{ProcessExecutor, TaskExecutor};
use crate::types::{Mode, RunOptions};

/// Result of executing a declaration.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub report: RunReport,
    /// Retry artifact written because the run failed.
    pub artifact: Option<PathBuf>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.report.is_success()
    }
}

/// High-level entry point used by `main.rs`.
///
/// A failed run surfaces as [`DagrunError::RunFailed`] naming the retry
/// artifact, so the process exits non-zero.
pub async fn run(args: CliArgs) -> Result<()> {
    let options = args.run_options();
    let path = PathBuf::from(&args.file);

    if options.mode == Mode::Dot {
        let raw = load_from_path(&path)?;
        dot::write_dot(&raw, std::io::stdout().lock())?;
        return Ok(());
    }

    let summary = run_file(&path, options).await?;
    match summary.artifact {
        Some(artifact) => Err(DagrunError::RunFailed { artifact }),
        None => {
            info!("");
            info!("Success");
            Ok(())
        }
    }
}

/// Validate and execute the declaration at `path` with real processes.
pub async fn run_file(path: &Path, options: RunOptions) -> Result<RunSummary> {
    let executor = ProcessExecutor::new(declaration_dir(path));
    run_file_with(path, options, executor).await
}

/// Validate and execute the declaration at `path` with the given executor.
///
/// - Validation failures return `Err` before anything runs.
/// - A run with failed tasks returns `Ok` with the report and the path of the
///   retry artifact written beside `path`.
/// - A fully successful, non-dry run removes every retry artifact belonging
///   to `path`.
pub async fn run_file_with<E>(path: &Path, options: RunOptions, executor: E) -> Result<RunSummary>
where
    E: TaskExecutor + 'static,
{
    options.validate()?;

    let raw = load_from_path(path)?;

    info!("Starting dagrun");
    info!("Dag: {}", path.display());
    info!("Dry: {}", options.dry_run);
    info!("Workers: {}", options.workers);
    info!("");

    let mut dag = validate(raw, &declaration_dir(path))?;
    info!("");

    if options.dry_run {
        dag.skip_all();
    } else {
        for name in dag.skipped_tasks() {
            info!(task = %name, "already succeeded in a previous run; skipping");
        }
    }

    let scheduler = Scheduler::new(&dag);
    let runtime = Runtime::new(scheduler, executor, options.workers);
    let scheduler = runtime.run().await?;
    let report = scheduler.report();

    if !report.is_success() {
        info!("");
        for (name, reason) in &report.failed {
            error!("[ERROR] {name}: {reason}");
        }
        let snapshot = dag.raw().with_success_flags(&scheduler.succeeded_flags());
        let artifact = persist::write_retry(&snapshot, path)?;
        return Ok(RunSummary {
            report,
            artifact: Some(artifact),
        });
    }

    if !options.dry_run {
        for removed in persist::remove_stale_artifacts(path)? {
            info!(path = %removed.display(), "removed retry artifact");
        }
    }

    Ok(RunSummary {
        report,
        artifact: None,
    })
}
