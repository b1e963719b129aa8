// src/config/model.rs

use serde::{Deserialize, Serialize};

/// A DAG declaration as read from (and written back to) a TOML file.
///
/// ```toml
/// name = "etl"
///
/// [[task]]
/// name = "extract"
/// file = ["extract.py"]
/// cmd = "python %s"
///
/// [[task]]
/// name = "load"
/// file = ["load.py"]
/// dep = ["extract"]
/// cmd = "python %s"
/// success = true
/// ```
///
/// Every field is optional at this layer. Missing values are reported by the
/// validator with a message naming the offending DAG or task, which reads
/// better than a deserialization error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawDag {
    /// DAG name, also used as the dot graph name.
    #[serde(default)]
    pub name: String,

    /// Tasks in declaration order (`[[task]]` tables).
    #[serde(default, rename = "task", skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<TaskDecl>,
}

/// One `[[task]]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskDecl {
    #[serde(default)]
    pub name: String,

    /// Required files, substituted into `cmd` in order.
    ///
    /// Relative paths resolve against the directory holding the declaration.
    #[serde(default, rename = "file")]
    pub files: Vec<String>,

    /// Names of tasks this one waits on.
    #[serde(default, rename = "dep")]
    pub deps: Vec<String>,

    /// Command template with one `%s` per required file.
    #[serde(default)]
    pub cmd: String,

    /// Persisted success flag; only meaningful in retry artifacts.
    #[serde(default)]
    pub success: bool,
}

impl RawDag {
    /// Position of the task with the given name, if any.
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.name == name)
    }

    /// Copy of this declaration with `success` replaced by the given flags
    /// (one per task, in declaration order).
    pub fn with_success_flags(&self, flags: &[bool]) -> RawDag {
        let mut out = self.clone();
        for (task, &succeeded) in out.tasks.iter_mut().zip(flags) {
            task.success = succeeded;
        }
        out
    }
}
