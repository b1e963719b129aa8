// src/dag/graph.rs

use std::collections::{HashMap, HashSet};

use crate::config::model::TaskDecl;
use crate::errors::{DagrunError, Result};

/// Index of a task in declaration order.
pub type TaskIndex = usize;

/// Index-based DAG adjacency.
///
/// Tasks are addressed by their position in the declaration, so parents and
/// children are plain integer lists instead of references between tasks.
#[derive(Debug, Clone)]
pub struct DagGraph {
    names: Vec<String>,
    index: HashMap<String, TaskIndex>,
    /// Tasks this one depends on, in declaration order.
    parents: Vec<Vec<TaskIndex>>,
    /// Tasks that depend on this one, in declaration order.
    children: Vec<Vec<TaskIndex>>,
}

impl DagGraph {
    /// Build adjacency from a declared task list.
    ///
    /// Fails with a structural error if a dependency names no task. Repeated
    /// names in one `dep` list collapse into a single edge.
    pub fn build(tasks: &[TaskDecl]) -> Result<Self> {
        let names: Vec<String> = tasks.iter().map(|t| t.name.clone()).collect();

        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            index.entry(name.clone()).or_insert(i);
        }

        let mut parents = vec![Vec::new(); names.len()];
        let mut children = vec![Vec::new(); names.len()];

        for (child, task) in tasks.iter().enumerate() {
            let mut deps = Vec::with_capacity(task.deps.len());
            for dep in &task.deps {
                let parent = *index.get(dep).ok_or_else(|| {
                    DagrunError::Structural(format!(
                        "task '{}' depends on missing task '{}'",
                        task.name, dep
                    ))
                })?;
                deps.push(parent);
            }
            deps.sort_unstable();
            deps.dedup();

            for parent in deps {
                parents[child].push(parent);
                children[parent].push(child);
            }
        }

        Ok(Self {
            names,
            index,
            parents,
            children,
        })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All task names in declaration order.
    pub fn tasks(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|s| s.as_str())
    }

    pub fn name(&self, task: TaskIndex) -> &str {
        &self.names[task]
    }

    pub fn index_of(&self, name: &str) -> Option<TaskIndex> {
        self.index.get(name).copied()
    }

    pub fn parents(&self, task: TaskIndex) -> &[TaskIndex] {
        &self.parents[task]
    }

    pub fn children(&self, task: TaskIndex) -> &[TaskIndex] {
        &self.children[task]
    }

    /// Tasks without dependencies, in declaration order.
    pub fn roots(&self) -> impl Iterator<Item = TaskIndex> + '_ {
        (0..self.len()).filter(|&i| self.parents[i].is_empty())
    }

    /// Every (parent, child) edge, grouped by child in declaration order.
    pub fn edges(&self) -> impl Iterator<Item = (TaskIndex, TaskIndex)> + '_ {
        self.parents
            .iter()
            .enumerate()
            .flat_map(|(child, ps)| ps.iter().map(move |&parent| (parent, child)))
    }

    /// All transitive descendants of `task`, each listed once.
    ///
    /// Diamonds reach the same descendant along several paths; the visited
    /// set keeps it to a single entry.
    pub fn descendants(&self, task: TaskIndex) -> Vec<TaskIndex> {
        let mut stack: Vec<TaskIndex> = self.children[task].clone();
        let mut visited: HashSet<TaskIndex> = HashSet::new();
        let mut out = Vec::new();

        while let Some(next) = stack.pop() {
            if !visited.insert(next) {
                continue;
            }
            out.push(next);
            stack.extend(self.children[next].iter().copied());
        }

        out
    }
}
