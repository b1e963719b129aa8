// tests/resume.rs

mod common;
use crate::common::{init_tracing, with_timeout, DagBuilder, FakeExecutor, TaskBuilder};

use std::error::Error;
use std::fs;
use std::path::Path;

use tempfile::tempdir;

use dagrun::config::load_from_path;
use dagrun::errors::DagrunError;
use dagrun::persist::{
    artifact_base, next_artifact_path, remove_stale_artifacts, write_artifact, write_retry,
};
use dagrun::run_file_with;
use dagrun::types::RunOptions;

type TestResult = Result<(), Box<dyn Error>>;

fn options() -> RunOptions {
    RunOptions {
        workers: 2,
        ..RunOptions::default()
    }
}

/// A and B independent, C depends on both.
fn write_etl(dir: &Path) -> std::path::PathBuf {
    DagBuilder::new("etl")
        .with_task(TaskBuilder::new("A", "echo extract").build())
        .with_task(TaskBuilder::new("B", "echo load").build())
        .with_task(TaskBuilder::new("C", "echo report").dep("A").dep("B").build())
        .write_to(dir, "etl.toml")
}

fn success_flags(path: &Path) -> Vec<(String, bool)> {
    load_from_path(path)
        .expect("artifact should parse")
        .tasks
        .into_iter()
        .map(|t| (t.name, t.success))
        .collect()
}

#[tokio::test]
async fn failed_run_writes_artifact_with_success_flags() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let input = write_etl(dir.path());

    let executor = FakeExecutor::new().failing(&["A"]);
    let summary = with_timeout(run_file_with(&input, options(), executor)).await?;

    assert!(!summary.is_success());
    let artifact = summary.artifact.expect("failed run writes an artifact");
    assert_eq!(artifact, dir.path().join("etl.retry-1.toml"));
    assert_eq!(
        success_flags(&artifact),
        vec![
            ("A".to_string(), false),
            ("B".to_string(), true),
            ("C".to_string(), false),
        ]
    );
    // The input itself is untouched.
    assert!(success_flags(&input).iter().all(|(_, s)| !s));
    Ok(())
}

#[tokio::test]
async fn resuming_runs_only_unfinished_tasks_and_cleans_up() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let input = write_etl(dir.path());

    let first = with_timeout(run_file_with(
        &input,
        options(),
        FakeExecutor::new().failing(&["A"]),
    ))
    .await?;
    let artifact = first.artifact.expect("artifact");

    let executor = FakeExecutor::new();
    let second = with_timeout(run_file_with(&artifact, options(), executor.clone())).await?;

    assert!(second.is_success());
    assert!(second.artifact.is_none());
    assert_eq!(executor.executed(), vec!["A", "C"]);
    assert_eq!(second.report.succeeded, vec!["A", "B", "C"]);

    assert!(!artifact.exists());
    assert!(input.exists());
    Ok(())
}

#[tokio::test]
async fn repeated_failure_picks_the_next_free_artifact_name() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let input = write_etl(dir.path());

    let failing = || FakeExecutor::new().failing(&["A"]);

    let first = with_timeout(run_file_with(&input, options(), failing())).await?;
    let retry1 = first.artifact.expect("artifact");

    let second = with_timeout(run_file_with(&retry1, options(), failing())).await?;
    let retry2 = second.artifact.expect("artifact");

    assert_eq!(retry2, dir.path().join("etl.retry-2.toml"));
    assert!(retry1.exists());
    assert_eq!(
        success_flags(&retry2),
        vec![
            ("A".to_string(), false),
            ("B".to_string(), true),
            ("C".to_string(), false),
        ]
    );

    // A later success removes both.
    let third = with_timeout(run_file_with(&retry2, options(), FakeExecutor::new())).await?;
    assert!(third.is_success());
    assert!(!retry1.exists());
    assert!(!retry2.exists());
    Ok(())
}

#[tokio::test]
async fn dry_run_executes_nothing_and_writes_nothing() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let input = write_etl(dir.path());
    fs::write(dir.path().join("etl.retry-1.toml"), "name = \"stale\"\n")?;

    let executor = FakeExecutor::new().failing(&["A", "B", "C"]);
    let opts = RunOptions {
        dry_run: true,
        ..options()
    };
    let summary = with_timeout(run_file_with(&input, opts, executor.clone())).await?;

    assert!(summary.is_success());
    assert!(executor.executed().is_empty());
    assert_eq!(summary.report.succeeded, vec!["A", "B", "C"]);
    // Dry runs leave existing artifacts alone.
    assert!(dir.path().join("etl.retry-1.toml").exists());
    Ok(())
}

#[tokio::test]
async fn zero_workers_is_rejected_before_loading() -> TestResult {
    let dir = tempdir()?;
    let input = dir.path().join("does-not-exist.toml");

    let opts = RunOptions {
        workers: 0,
        ..RunOptions::default()
    };
    let err = run_file_with(&input, opts, FakeExecutor::new())
        .await
        .expect_err("zero workers must fail");
    assert!(matches!(err, DagrunError::Config(_)));
    Ok(())
}

#[test]
fn artifact_names_strip_existing_retry_suffix() {
    assert_eq!(artifact_base(Path::new("/tmp/etl.toml")), "etl");
    assert_eq!(artifact_base(Path::new("/tmp/etl.retry-7.toml")), "etl");
    assert_eq!(artifact_base(Path::new("/tmp/etl.retry-x.toml")), "etl.retry-x");
}

#[test]
fn stale_artifact_cleanup_leaves_unrelated_files() -> TestResult {
    let dir = tempdir()?;
    let input = dir.path().join("etl.toml");
    fs::write(&input, "")?;
    for name in ["etl.retry-1.toml", "etl.retry-12.toml", "etl.retry-.toml", "other.retry-1.toml", "etl.retry-1.txt"] {
        fs::write(dir.path().join(name), "")?;
    }

    let removed = remove_stale_artifacts(&input)?;

    assert_eq!(
        removed,
        vec![
            dir.path().join("etl.retry-1.toml"),
            dir.path().join("etl.retry-12.toml"),
        ]
    );
    assert!(dir.path().join("etl.retry-.toml").exists());
    assert!(dir.path().join("other.retry-1.toml").exists());
    assert!(dir.path().join("etl.retry-1.txt").exists());
    assert_eq!(next_artifact_path(&input), dir.path().join("etl.retry-1.toml"));
    Ok(())
}

#[test]
fn retry_artifact_path_is_absolute_for_relative_input() -> TestResult {
    let dir = tempfile::tempdir_in(".")?;
    let relative = dir.path().strip_prefix(std::env::current_dir()?)?;
    assert!(relative.is_relative());
    let input = relative.join("etl.toml");
    let raw = DagBuilder::new("etl")
        .with_task(TaskBuilder::new("A", "echo A").build())
        .build();

    let artifact = write_retry(&raw, &input)?;

    assert!(artifact.is_absolute(), "{}", artifact.display());
    assert!(artifact.ends_with("etl.retry-1.toml"));
    assert!(artifact.exists());
    Ok(())
}

#[test]
fn unwritable_artifact_is_a_persistence_error() -> TestResult {
    let dir = tempdir()?;
    let target = dir.path().join("no-such-dir").join("etl.retry-1.toml");
    let raw = DagBuilder::new("etl")
        .with_task(TaskBuilder::new("A", "echo A").build())
        .build();

    match write_artifact(&raw, &target) {
        Err(DagrunError::Persistence { path, .. }) => assert_eq!(path, target),
        other => panic!("expected Persistence error, got {other:?}"),
    }
    Ok(())
}
