// src/exec/task_runner.rs

//! Individual task process runner.

use std::path::Path;
use std::process::Stdio;

use anyhow::{bail, Context};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::dag::ScheduledTask;
use crate::errors::{DagrunError, Result};
use crate::exec::command::split_command;

/// Run one task's resolved command to completion.
///
/// The command is split on whitespace and spawned directly (no shell), in
/// `work_dir`, inheriting the environment. Stdout and stderr are drained
/// concurrently and logged line by line. Succeeds iff the process starts,
/// both streams drain cleanly, and it exits with status 0.
pub async fn run_task(task: &ScheduledTask, work_dir: &Path) -> Result<()> {
    let command = task.command()?;
    let (program, args) = split_command(&task.name, &command)?;

    run_process(&task.name, program, &args, work_dir)
        .await
        .map_err(|err| DagrunError::Execution {
            task: task.name.clone(),
            reason: format!("{err:#}"),
        })
}

async fn run_process(
    name: &str,
    program: &str,
    args: &[&str],
    work_dir: &Path,
) -> anyhow::Result<()> {
    debug!(task = %name, program, ?args, dir = ?work_dir, "starting task process");

    let mut child = Command::new(program)
        .args(args)
        .current_dir(work_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("spawning '{program}'"))?;

    let stdout = child.stdout.take().context("capturing stdout")?;
    let stderr = child.stderr.take().context("capturing stderr")?;

    let (out_res, err_res) = tokio::join!(
        drain_lines(name, "stdout", stdout),
        drain_lines(name, "stderr", stderr),
    );

    if out_res.is_err() || err_res.is_err() {
        // A stream we stopped reading could block the child on a full pipe.
        let _ = child.start_kill();
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for '{program}'"))?;

    out_res.context("reading stdout")?;
    err_res.context("reading stderr")?;

    debug!(task = %name, exit_code = ?status.code(), success = status.success(), "task process exited");

    if !status.success() {
        bail!("'{program}' {status}");
    }
    Ok(())
}

/// Log every line of `stream` as `<task> (<label>) <line>`.
///
/// Lines keep their order within one stream. Invalid UTF-8 is replaced
/// rather than treated as an error.
async fn drain_lines<R>(task: &str, label: &str, stream: R) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf);
        info!("{} ({}) {}", task, label, line.trim_end_matches(['\n', '\r']));
    }
}
