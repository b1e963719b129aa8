// tests/command_substitution.rs

use dagrun::errors::DagrunError;
use dagrun::exec::{count_placeholders, resolve_command, split_command};

fn files(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn files_are_substituted_in_order() {
    let cmd = resolve_command("t", "python %s %s", &files(&["a.py", "b.py"])).unwrap();
    assert_eq!(cmd, "python a.py b.py");
}

#[test]
fn template_without_placeholders_is_unchanged() {
    let cmd = resolve_command("t", "make all", &[]).unwrap();
    assert_eq!(cmd, "make all");
}

#[test]
fn double_percent_is_a_literal_percent() {
    assert_eq!(count_placeholders("date +%%s %s"), 1);
    let cmd = resolve_command("t", "date +%%s %s", &files(&["x"])).unwrap();
    assert_eq!(cmd, "date +%s x");
}

#[test]
fn other_percent_sequences_are_copied() {
    let cmd = resolve_command("t", "printf %d%", &[]).unwrap();
    assert_eq!(cmd, "printf %d%");
}

#[test]
fn too_few_files_is_a_mismatch() {
    match resolve_command("t", "cat %s %s", &files(&["only.txt"])) {
        Err(DagrunError::PlaceholderMismatch {
            task,
            placeholders,
            files,
        }) => {
            assert_eq!(task, "t");
            assert_eq!(placeholders, 2);
            assert_eq!(files, 1);
        }
        other => panic!("expected PlaceholderMismatch, got {other:?}"),
    }
}

#[test]
fn too_many_files_is_a_mismatch() {
    let result = resolve_command("t", "cat %s", &files(&["a", "b"]));
    assert!(matches!(
        result,
        Err(DagrunError::PlaceholderMismatch {
            placeholders: 1,
            files: 2,
            ..
        })
    ));
}

#[test]
fn command_splits_on_whitespace_without_quoting() {
    let (program, args) = split_command("t", "  echo  'hello world'\tdone ").unwrap();
    assert_eq!(program, "echo");
    assert_eq!(args, vec!["'hello", "world'", "done"]);
}

#[test]
fn blank_command_cannot_be_split() {
    assert!(matches!(
        split_command("t", "   "),
        Err(DagrunError::Execution { .. })
    ));
}
