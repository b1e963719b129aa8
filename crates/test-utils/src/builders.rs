use std::path::{Path, PathBuf};

use dagrun::config::{RawDag, TaskDecl};

/// Builder for `RawDag` to simplify test setup.
pub struct DagBuilder {
    dag: RawDag,
}

impl DagBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            dag: RawDag {
                name: name.to_string(),
                tasks: Vec::new(),
            },
        }
    }

    pub fn with_task(mut self, task: TaskDecl) -> Self {
        self.dag.tasks.push(task);
        self
    }

    pub fn build(self) -> RawDag {
        self.dag
    }

    /// Write the declaration as `dir/file_name` and return its path.
    pub fn write_to(self, dir: &Path, file_name: &str) -> PathBuf {
        let path = dir.join(file_name);
        dagrun::persist::write_artifact(&self.dag, &path)
            .expect("Failed to write declaration from builder");
        path
    }
}

/// Builder for `TaskDecl`.
pub struct TaskBuilder {
    task: TaskDecl,
}

impl TaskBuilder {
    pub fn new(name: &str, cmd: &str) -> Self {
        Self {
            task: TaskDecl {
                name: name.to_string(),
                files: vec![],
                deps: vec![],
                cmd: cmd.to_string(),
                success: false,
            },
        }
    }

    pub fn dep(mut self, dep: &str) -> Self {
        self.task.deps.push(dep.to_string());
        self
    }

    pub fn file(mut self, path: &str) -> Self {
        self.task.files.push(path.to_string());
        self
    }

    pub fn success(mut self, val: bool) -> Self {
        self.task.success = val;
        self
    }

    pub fn build(self) -> TaskDecl {
        self.task
    }
}
