// src/persist.rs

//! Retry artifacts.
//!
//! When a run fails, the declaration is written back out beside the input
//! with each task's `success` flag set from this run. Feeding that file back
//! in skips every task that already succeeded and resumes at the frontier of
//! incomplete work.
//!
//! Artifacts are named `<base>.retry-<N>.toml`, where `<base>` is the input's
//! file stem without any `.retry-<N>` suffix of its own.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, info};

use crate::config::declaration_dir;
use crate::config::model::RawDag;
use crate::errors::{DagrunError, Result};

/// Extension used for retry artifacts.
pub const RETRY_EXTENSION: &str = "toml";

/// The declaration's base name with any retry suffix removed.
pub fn artifact_base(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    // "etl.retry-3" -> "etl"
    if let Some((base, n)) = stem.rsplit_once(".retry-") {
        if !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()) {
            return base.to_string();
        }
    }
    stem
}

/// Pick a fresh artifact path beside `input`.
///
/// Uses the smallest `N >= 1` whose path is neither the input itself nor an
/// existing file.
pub fn next_artifact_path(input: &Path) -> PathBuf {
    let dir = declaration_dir(input);
    let base = artifact_base(input);

    let mut n: u32 = 1;
    loop {
        let candidate = dir.join(format!("{base}.retry-{n}.{RETRY_EXTENSION}"));
        if candidate != input && !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

/// Serialize `dag` to `path` in the declaration format.
///
/// Every failure, serialization included, is reported as
/// [`DagrunError::Persistence`].
pub fn write_artifact(dag: &RawDag, path: &Path) -> Result<()> {
    let persist_err = |source: io::Error| DagrunError::Persistence {
        path: path.to_path_buf(),
        source,
    };

    let text = toml::to_string_pretty(dag).map_err(|e| persist_err(io::Error::other(e)))?;

    let file = File::create(path).map_err(persist_err)?;
    let mut w = BufWriter::new(file);
    w.write_all(text.as_bytes()).map_err(persist_err)?;
    w.flush().map_err(persist_err)?;

    info!(path = %path.display(), "wrote retry artifact");
    Ok(())
}

/// Write the retry artifact for a failed run of `input`, returning its
/// absolute path.
pub fn write_retry(dag: &RawDag, input: &Path) -> Result<PathBuf> {
    let path = next_artifact_path(input);
    let path = std::path::absolute(&path).map_err(|source| DagrunError::Persistence {
        path: path.clone(),
        source,
    })?;
    write_artifact(dag, &path)?;
    Ok(path)
}

/// Remove every retry artifact that belongs to `input`, including `input`
/// itself if it is one. Returns the removed paths.
pub fn remove_stale_artifacts(input: &Path) -> Result<Vec<PathBuf>> {
    let dir = declaration_dir(input);
    let base = artifact_base(input);
    let pattern = Regex::new(&format!(
        r"^{}\.retry-[0-9]+\.{}$",
        regex::escape(&base),
        regex::escape(RETRY_EXTENSION)
    ))
    .map_err(|e| DagrunError::Other(e.into()))?;

    let mut removed = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !pattern.is_match(name) || !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        fs::remove_file(&path)?;
        debug!(path = %path.display(), "removed stale retry artifact");
        removed.push(path);
    }

    removed.sort();
    Ok(removed)
}
