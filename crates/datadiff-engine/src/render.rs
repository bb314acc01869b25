//! Textual rendering of a [`DiffResult`].
//!
//! Structural diffs print one item per line with a `-`, `+` or space prefix
//! and a trailing comma, framed by the container delimiters. Nested diffs are
//! indented one space per level. Text diffs print as a conventional unified
//! diff. Only the outermost result prints the `--- a` / `+++ b` header.

use std::fmt;
use std::ops::Range;

use crate::align::ContextWindow;
use crate::result::{DataType, DiffOperation, DiffResult};

/// What a rendered line represents, for callers that style the output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    /// `--- a` / `+++ b`.
    Header,
    /// A hunk header or elision marker.
    Hunk,
    Delete,
    Insert,
    /// Unchanged items and container delimiters.
    Context,
}

impl DiffResult<'_> {
    /// Render into lines at the given nesting depth.
    pub fn render_lines(&self, depth: usize) -> Vec<String> {
        self.render_tagged(depth)
            .into_iter()
            .map(|(_, line)| line)
            .collect()
    }

    /// Render into lines tagged with their [`LineKind`].
    pub fn render_tagged(&self, depth: usize) -> Vec<(LineKind, String)> {
        let mut lines = Vec::new();
        self.render_into(&mut lines, depth);
        lines
    }

    fn render_into(&self, out: &mut Vec<(LineKind, String)>, depth: usize) {
        if self.operations.is_empty() {
            return;
        }
        let text = self.data_type == DataType::Text;
        let indent = " ".repeat(depth);
        let terminator = if text { "" } else { "," };

        if depth == 0 {
            out.push((LineKind::Header, "--- a".to_owned()));
            out.push((LineKind::Header, "+++ b".to_owned()));
        }
        if !self.open.is_empty() {
            out.push((LineKind::Context, format!("{indent}{}", self.open)));
        }
        for op in &self.operations {
            match op {
                DiffOperation::Context(window) => {
                    let header = if text {
                        unified_header(window)
                    } else {
                        structural_header(window)
                    };
                    out.push((LineKind::Hunk, format!("{indent}{header}")));
                }
                DiffOperation::Elision => out.push((LineKind::Hunk, format!("{indent}@@  @@"))),
                DiffOperation::Nested(nested) => {
                    let start = out.len();
                    nested.render_into(out, depth + 1);
                    if out.len() > start {
                        if let Some((_, last)) = out.last_mut() {
                            last.push(',');
                        }
                    }
                }
                DiffOperation::Delete(items)
                | DiffOperation::Insert(items)
                | DiffOperation::Equal(items) => {
                    let (kind, prefix) = match op {
                        DiffOperation::Delete(_) => (LineKind::Delete, '-'),
                        DiffOperation::Insert(_) => (LineKind::Insert, '+'),
                        _ => (LineKind::Context, ' '),
                    };
                    for item in items {
                        out.push((kind, format!("{indent}{prefix}{item}{terminator}")));
                    }
                }
            }
        }
        if !self.close.is_empty() {
            out.push((LineKind::Context, format!("{indent}{}", self.close)));
        }
    }
}

impl fmt::Display for DiffResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_lines(0).join("\n"))
    }
}

fn span(start: usize, end: usize) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{start},{end}")
    }
}

fn structural_header(window: &ContextWindow) -> String {
    let (old_start, old_end, new_start, new_end) = window.spans();
    format!(
        "@@ -{} +{} @@",
        span(old_start, old_end),
        span(new_start, new_end)
    )
}

/// One-based `start,length` ranges; a single line omits the length and an
/// empty range points at the line before it.
fn unified_range(range: &Range<usize>) -> String {
    let beginning = range.start + 1;
    match range.len() {
        0 => format!("{},0", beginning - 1),
        1 => beginning.to_string(),
        len => format!("{beginning},{len}"),
    }
}

fn unified_header(window: &ContextWindow) -> String {
    format!(
        "@@ -{} +{} @@",
        unified_range(&window.old),
        unified_range(&window.new)
    )
}
