// src/dot.rs

//! Graphviz export of a declaration.

use std::io::{self, BufWriter, Write};

use crate::config::model::RawDag;

/// Write `dag` as a dot digraph: one node per task, one edge per declared
/// dependency (`dep -> task`). Nothing is validated or executed.
pub fn write_dot(dag: &RawDag, out: impl Write) -> io::Result<()> {
    let mut w = BufWriter::new(out);

    writeln!(w, "digraph {} {{", dag.name)?;
    writeln!(w)?;
    for task in &dag.tasks {
        writeln!(w, "  {} [label=\"{}\"];", task.name, task.name)?;
        for dep in &task.deps {
            writeln!(w, "  {} -> {};", dep, task.name)?;
        }
    }
    writeln!(w)?;
    writeln!(w, "}}")?;

    w.flush()
}

/// Convenience wrapper returning the dot text.
pub fn to_dot(dag: &RawDag) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_dot(dag, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}
