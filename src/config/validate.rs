// src/config/validate.rs

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::Path;

use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use tracing::info;

use crate::config::model::{RawDag, TaskDecl};
use crate::dag::{Dag, DagGraph, TaskIndex};
use crate::errors::{DagrunError, Result};

/// Run every check against a declaration and return the validated [`Dag`].
///
/// Checks run in a fixed order and the first failure aborts:
/// 1. the DAG has a name
/// 2. the DAG has at least one task
/// 3. task names are set and unique
/// 4. per task, in declaration order: name, command, required files (relative
///    to `base_dir`), dependencies
/// 5. no circular dependency
///
/// Each passing check is logged.
pub fn validate(raw: RawDag, base_dir: &Path) -> Result<Dag> {
    validate_name(&raw)?;
    info!("[PASS] check dag '{}' name", raw.name);

    validate_task_count(&raw)?;
    info!("[PASS] check dag '{}' task count", raw.name);

    validate_task_names(&raw)?;
    info!("[PASS] check dag '{}' task names", raw.name);

    for task in &raw.tasks {
        validate_task(&raw, task, base_dir)?;
    }

    let graph = DagGraph::build(&raw.tasks)?;
    check_cycles(&graph)?;
    info!("[PASS] check dag '{}' for circular dependency", raw.name);

    Ok(Dag::new(raw, graph, base_dir.to_path_buf()))
}

fn validate_name(dag: &RawDag) -> Result<()> {
    if dag.name.is_empty() {
        return Err(DagrunError::Structural(
            "dag name attribute must be set".to_string(),
        ));
    }
    Ok(())
}

fn validate_task_count(dag: &RawDag) -> Result<()> {
    if dag.tasks.is_empty() {
        return Err(DagrunError::Structural(format!(
            "dag '{}' has no tasks",
            dag.name
        )));
    }
    Ok(())
}

fn validate_task_names(dag: &RawDag) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::new();
    for task in &dag.tasks {
        validate_task_name(task)?;
        if !seen.insert(task.name.as_str()) {
            return Err(DagrunError::Structural(format!(
                "two tasks have the same name '{}'",
                task.name
            )));
        }
    }
    Ok(())
}

fn validate_task(dag: &RawDag, task: &TaskDecl, base_dir: &Path) -> Result<()> {
    validate_task_name(task)?;
    info!("[PASS] check task '{}' name", task.name);

    if task.cmd.trim().is_empty() {
        return Err(DagrunError::Structural(format!(
            "task '{}' has no command set",
            task.name
        )));
    }
    info!("[PASS] check task '{}' command", task.name);

    for file in &task.files {
        match std::fs::metadata(base_dir.join(file)) {
            Ok(_) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(DagrunError::Structural(format!(
                    "task '{}' requires missing file '{}'",
                    task.name, file
                )));
            }
            Err(err) => return Err(err.into()),
        }
    }
    for file in &task.files {
        info!("[PASS] check task '{}' file '{}'", task.name, file);
    }

    for dep in &task.deps {
        if dag.position_of(dep).is_none() {
            return Err(DagrunError::Structural(format!(
                "task '{}' depends on missing task '{}'",
                task.name, dep
            )));
        }
        if *dep == task.name {
            return Err(DagrunError::Structural(format!(
                "task '{}' depends on itself",
                task.name
            )));
        }
    }
    for dep in &task.deps {
        info!("[PASS] check task '{}' dependency '{}'", task.name, dep);
    }

    Ok(())
}

fn validate_task_name(task: &TaskDecl) -> Result<()> {
    if task.name.is_empty() {
        return Err(DagrunError::Structural(
            "task name attribute must be set".to_string(),
        ));
    }
    Ok(())
}

/// Kahn's algorithm over the parent -> child edges.
///
/// Starting from the tasks without parents, each popped task has its
/// outgoing edges removed; a child whose last incoming edge is gone joins the
/// worklist. Whatever edges survive belong to at least one cycle and are
/// reported as `(child) -> (parent)` pairs.
pub fn check_cycles(graph: &DagGraph) -> Result<()> {
    let mut g: StableDiGraph<TaskIndex, ()> = StableDiGraph::with_capacity(graph.len(), 0);
    let nodes: Vec<NodeIndex> = (0..graph.len()).map(|i| g.add_node(i)).collect();
    for (parent, child) in graph.edges() {
        g.add_edge(nodes[parent], nodes[child], ());
    }

    let mut worklist: Vec<NodeIndex> = graph.roots().map(|i| nodes[i]).collect();

    while let Some(n) = worklist.pop() {
        let outgoing: Vec<_> = g
            .edges_directed(n, Direction::Outgoing)
            .map(|e| (e.id(), e.target()))
            .collect();

        for (edge, child) in outgoing {
            g.remove_edge(edge);
            if g.neighbors_directed(child, Direction::Incoming).next().is_none() {
                worklist.push(child);
            }
        }
    }

    if g.edge_count() == 0 {
        return Ok(());
    }

    let remaining: Vec<String> = g
        .edge_indices()
        .filter_map(|e| g.edge_endpoints(e))
        .map(|(parent, child)| format!("({}) -> ({})", graph.name(g[child]), graph.name(g[parent])))
        .collect();

    Err(DagrunError::Cycle(remaining.join(", ")))
}
