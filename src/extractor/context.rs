//! Line context around a location in a file.

use std::path::Path;

/// Text surrounding a target line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextWindow {
    /// Up to `radius` lines before the target, trailing whitespace trimmed
    pub before: String,
    /// The target line without its line ending
    pub line: String,
    /// Up to `radius` lines after the target, trailing whitespace trimmed
    pub after: String,
}

impl ContextWindow {
    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.line.is_empty() && self.after.is_empty()
    }
}

/// Read `radius` lines either side of 1-indexed `line_number`.
///
/// Returns an empty window if the file cannot be read or the line is out of range.
pub fn extract_context(path: &Path, line_number: usize, radius: usize) -> ContextWindow {
    match std::fs::read_to_string(path) {
        Ok(source) => context_in(&source, line_number, radius),
        Err(_) => ContextWindow::default(),
    }
}

pub(crate) fn context_in(source: &str, line_number: usize, radius: usize) -> ContextWindow {
    let lines: Vec<&str> = source.split_inclusive('\n').collect();
    if line_number < 1 || line_number > lines.len() {
        return ContextWindow::default();
    }

    let target = line_number - 1;
    let start = target.saturating_sub(radius);
    let end = (line_number + radius).min(lines.len());

    ContextWindow {
        before: lines[start..target].concat().trim_end().to_string(),
        line: lines[target].trim_end().to_string(),
        after: lines[line_number..end].concat().trim_end().to_string(),
    }
}
