// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::RawDag;
use crate::config::validate::validate;
use crate::dag::Dag;
use crate::errors::Result;

/// Load a declaration file and return the raw `RawDag`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation (names, files, dependencies, cycles). Use [`load_and_validate`]
/// for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawDag> {
    let contents = fs::read_to_string(path.as_ref())?;
    parse_str(&contents)
}

/// Parse a declaration from TOML text.
pub fn parse_str(contents: &str) -> Result<RawDag> {
    let dag: RawDag = toml::from_str(contents)?;
    Ok(dag)
}

/// Load a declaration and run every validation check against it.
///
/// Required files are resolved relative to the declaration's directory.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Dag> {
    let path = path.as_ref();
    let raw = load_from_path(path)?;
    validate(raw, &declaration_dir(path))
}

/// Directory that relative paths in a declaration resolve against.
///
/// - "pipelines/etl.toml" resolves against "pipelines".
/// - A bare "etl.toml" (empty parent) resolves against ".".
pub fn declaration_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
