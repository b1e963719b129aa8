// src/exec/command.rs

//! Command template resolution.
//!
//! A template holds positional `%s` placeholders, each replaced by the next
//! required file in declaration order. `%%` is a literal `%`; any other `%`
//! sequence is copied as-is. The placeholder count must match the file count
//! exactly; a mismatch is reported when the task is about to run.

use crate::errors::{DagrunError, Result};

/// Number of `%s` placeholders in a template.
pub fn count_placeholders(template: &str) -> usize {
    let mut count = 0;
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            continue;
        }
        match chars.peek() {
            Some('s') => {
                count += 1;
                chars.next();
            }
            Some('%') => {
                chars.next();
            }
            _ => {}
        }
    }
    count
}

/// Substitute `files` into `template` in order.
pub fn resolve_command(task: &str, template: &str, files: &[String]) -> Result<String> {
    let placeholders = count_placeholders(template);
    if placeholders != files.len() {
        return Err(DagrunError::PlaceholderMismatch {
            task: task.to_string(),
            placeholders,
            files: files.len(),
        });
    }

    let mut out = String::with_capacity(template.len());
    let mut files = files.iter();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('s') => {
                chars.next();
                // Counted above, so there is always a file left here.
                if let Some(file) = files.next() {
                    out.push_str(file);
                }
            }
            Some('%') => {
                chars.next();
                out.push('%');
            }
            _ => out.push('%'),
        }
    }

    Ok(out)
}

/// Split a resolved command into program and arguments on whitespace.
///
/// No shell quoting or escaping is honored.
pub fn split_command<'a>(task: &str, command: &'a str) -> Result<(&'a str, Vec<&'a str>)> {
    let mut parts = command.split_whitespace();
    let program = parts.next().ok_or_else(|| DagrunError::Execution {
        task: task.to_string(),
        reason: "command is empty".to_string(),
    })?;
    Ok((program, parts.collect()))
}
