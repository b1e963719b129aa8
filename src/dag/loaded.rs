// src/dag/loaded.rs

use std::path::{Path, PathBuf};

use crate::config::model::RawDag;
use crate::dag::graph::{DagGraph, TaskIndex};

/// A declaration that passed validation, ready to schedule.
///
/// On load, every task whose persisted `success` flag is set is marked to be
/// skipped this run, and all in-memory success state starts out false. The
/// persisted flag only decides skip vs run.
#[derive(Debug, Clone)]
pub struct Dag {
    raw: RawDag,
    graph: DagGraph,
    base_dir: PathBuf,
    skip: Vec<bool>,
}

impl Dag {
    /// Only `config::validate` builds these.
    pub(crate) fn new(raw: RawDag, graph: DagGraph, base_dir: PathBuf) -> Self {
        let skip = raw.tasks.iter().map(|t| t.success).collect();
        Self {
            raw,
            graph,
            base_dir,
            skip,
        }
    }

    pub fn name(&self) -> &str {
        &self.raw.name
    }

    /// The declaration as loaded, persisted success flags included.
    pub fn raw(&self) -> &RawDag {
        &self.raw
    }

    pub fn graph(&self) -> &DagGraph {
        &self.graph
    }

    /// Directory that required files and commands resolve against.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn is_skipped(&self, task: TaskIndex) -> bool {
        self.skip[task]
    }

    /// Names of tasks that will be skipped, in declaration order.
    pub fn skipped_tasks(&self) -> Vec<&str> {
        self.graph
            .tasks()
            .zip(&self.skip)
            .filter_map(|(name, &skip)| skip.then_some(name))
            .collect()
    }

    /// Dry run: skip every task.
    pub fn skip_all(&mut self) {
        self.skip.iter_mut().for_each(|s| *s = true);
    }
}
