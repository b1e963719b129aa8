#![allow(dead_code)]

use std::path::Path;

use dagrun::config::{validate, RawDag};
use dagrun::dag::Dag;

pub use dagrun_test_utils::builders::{DagBuilder, TaskBuilder};
pub use dagrun_test_utils::fake_executor::FakeExecutor;
pub use dagrun_test_utils::{init_tracing, with_timeout};

/// Validate a declaration whose tasks require no files.
pub fn validated(raw: RawDag) -> Dag {
    validate(raw, Path::new(".")).expect("declaration should validate")
}

/// A, B independent; C depends on both.
pub fn fan_in() -> RawDag {
    DagBuilder::new("fan_in")
        .with_task(TaskBuilder::new("A", "echo A").build())
        .with_task(TaskBuilder::new("B", "echo B").build())
        .with_task(TaskBuilder::new("C", "echo C").dep("A").dep("B").build())
        .build()
}

/// A at the top; B and C depend on A; D depends on B and C.
pub fn diamond() -> RawDag {
    DagBuilder::new("diamond")
        .with_task(TaskBuilder::new("A", "echo A").build())
        .with_task(TaskBuilder::new("B", "echo B").dep("A").build())
        .with_task(TaskBuilder::new("C", "echo C").dep("A").build())
        .with_task(TaskBuilder::new("D", "echo D").dep("B").dep("C").build())
        .build()
}
