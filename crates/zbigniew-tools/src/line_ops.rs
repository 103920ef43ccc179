//! Line-operation engine for `edit_file`.
//!
//! Content flows through four pure stages, each taking the previous stage's
//! output by value or reference:
//!
//! ```text
//! content ──▶ apply_replacements ──▶ split_lines ──▶ sort_descending ──▶ apply_line_operation* ──▶ join_lines
//! ```
//!
//! Line numbers are 1-based and always refer to the working line array as it
//! stands when the operation runs. Operations are applied highest target line
//! first: an insert or delete only shifts lines at or after its own index, so
//! every operation that already ran (all at higher lines) keeps its position.

use std::cmp::Reverse;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Text for an insert or replace: one line or several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LineContent {
    Single(String),
    Many(Vec<String>),
}

impl Default for LineContent {
    fn default() -> Self {
        Self::Single(String::new())
    }
}

impl LineContent {
    /// Lines to splice into the array.
    pub fn into_lines(self) -> Vec<String> {
        match self {
            Self::Single(line) => vec![line],
            Self::Many(lines) => lines,
        }
    }

    /// Collapse into a single slot value.
    pub fn into_joined(self) -> String {
        match self {
            Self::Single(line) => line,
            Self::Many(lines) => lines.join("\n"),
        }
    }
}

impl From<&str> for LineContent {
    fn from(s: &str) -> Self {
        Self::Single(s.to_string())
    }
}

impl From<Vec<&str>> for LineContent {
    fn from(lines: Vec<&str>) -> Self {
        Self::Many(lines.into_iter().map(str::to_string).collect())
    }
}

/// One line-targeted edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOperation {
    /// Insert before `line`; past the end appends.
    Insert { line: i64, content: LineContent },
    /// Overwrite `line`.
    Replace { line: i64, content: String },
    /// Remove `start_line..=end_line`; `end_line` defaults to `start_line`.
    Delete { start_line: i64, end_line: Option<i64> },
    /// Unrecognized kind. Kept so it can be reported in order.
    Unknown { kind: String, line: Option<i64> },
}

impl LineOperation {
    /// Line the operation is sorted by.
    pub fn target_line(&self) -> i64 {
        match self {
            Self::Insert { line, .. } | Self::Replace { line, .. } => *line,
            Self::Delete { start_line, .. } => *start_line,
            Self::Unknown { line, .. } => line.unwrap_or(0),
        }
    }

    /// Kind name as reported in outcomes.
    pub fn kind(&self) -> &str {
        match self {
            Self::Insert { .. } => "insert",
            Self::Replace { .. } => "replace",
            Self::Delete { .. } => "delete",
            Self::Unknown { kind, .. } => kind,
        }
    }
}

/// Outcome of a single line operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineOpOutcome {
    pub operation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_line: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_line: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines_deleted: Option<usize>,
    pub success: bool,
    /// Line overwritten by a replace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_content: Option<String>,
    /// Lines removed by a delete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_content: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LineOpOutcome {
    fn new(operation: impl Into<String>, success: bool) -> Self {
        Self {
            operation: operation.into(),
            line: None,
            start_line: None,
            end_line: None,
            lines_deleted: None,
            success,
            old_content: None,
            deleted_content: None,
            error: None,
        }
    }

    fn failed(operation: impl Into<String>, error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::new(operation, false)
        }
    }
}

/// Result of running the whole pipeline over one file's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub content: String,
    /// Occurrence counts for replacements that matched at least once, in request order.
    pub replacements: IndexMap<String, usize>,
    /// Outcomes in application order (descending target line).
    pub operations: Vec<LineOpOutcome>,
    /// Line count after replacements, before any line operation. `None` when
    /// no line operations were requested.
    pub lines_before: Option<usize>,
}

/// Replace every non-overlapping occurrence of each key, in map order.
///
/// Each pair sees the output of the previous one. Keys with no occurrences
/// (and the empty key) are left out of the returned counts.
pub fn apply_replacements(
    content: &str,
    replacements: &IndexMap<String, String>,
) -> (String, IndexMap<String, usize>) {
    let mut content = content.to_string();
    let mut counts = IndexMap::new();

    for (old, new) in replacements {
        if old.is_empty() {
            continue;
        }
        let count = content.matches(old.as_str()).count();
        if count > 0 {
            content = content.replace(old.as_str(), new);
            counts.insert(old.clone(), count);
        }
    }

    (content, counts)
}

/// Split on `\n`. A single trailing newline does not start another line.
pub fn split_lines(content: &str) -> Vec<String> {
    if content.is_empty() {
        return Vec::new();
    }
    let body = content.strip_suffix('\n').unwrap_or(content);
    body.split('\n').map(str::to_string).collect()
}

/// Join with `\n`, no trailing newline.
pub fn join_lines(lines: &[String]) -> String {
    lines.join("\n")
}

/// Order operations by descending target line.
///
/// The sort is stable: operations on the same line run in request order.
pub fn sort_descending(mut ops: Vec<LineOperation>) -> Vec<LineOperation> {
    ops.sort_by_key(|op| Reverse(op.target_line()));
    ops
}

/// Apply one operation to the working array.
///
/// Failed operations leave `lines` untouched.
pub fn apply_line_operation(lines: &mut Vec<String>, op: LineOperation) -> LineOpOutcome {
    let len = lines.len();

    match op {
        LineOperation::Insert { line, content } => {
            let idx = clamp_index(line.saturating_sub(1), len);
            let new_lines = content.into_lines();
            lines.splice(idx..idx, new_lines);
            LineOpOutcome {
                line: Some(line),
                ..LineOpOutcome::new("insert", true)
            }
        }
        LineOperation::Replace { line, content } => {
            if line >= 1 && line <= len as i64 {
                let idx = (line - 1) as usize;
                let old = std::mem::replace(&mut lines[idx], content);
                LineOpOutcome {
                    line: Some(line),
                    old_content: Some(old),
                    ..LineOpOutcome::new("replace", true)
                }
            } else {
                LineOpOutcome {
                    line: Some(line),
                    ..LineOpOutcome::failed(
                        "replace",
                        format!("Line {line} is out of range (1-{len})"),
                    )
                }
            }
        }
        LineOperation::Delete { start_line, end_line } => {
            let end_line = end_line.unwrap_or(start_line);
            let start_idx = start_line.saturating_sub(1).max(0);
            let end_idx = end_line.min(len as i64);

            if start_idx < end_idx {
                let removed: Vec<String> =
                    lines.drain(start_idx as usize..end_idx as usize).collect();
                LineOpOutcome {
                    start_line: Some(start_line),
                    end_line: Some(end_line),
                    lines_deleted: Some(removed.len()),
                    deleted_content: Some(removed),
                    ..LineOpOutcome::new("delete", true)
                }
            } else {
                LineOpOutcome {
                    start_line: Some(start_line),
                    end_line: Some(end_line),
                    ..LineOpOutcome::failed(
                        "delete",
                        format!("Invalid line range: {start_line}-{end_line}"),
                    )
                }
            }
        }
        LineOperation::Unknown { kind, .. } => {
            let error = format!("Unknown operation type: {kind}");
            LineOpOutcome::failed(kind, error)
        }
    }
}

fn clamp_index(idx: i64, len: usize) -> usize {
    idx.clamp(0, len as i64) as usize
}

/// Run the full pipeline: replacements, then (if any) line operations.
///
/// Content is only split and rejoined when `ops` is non-empty, so a
/// replacements-only edit preserves line endings and trailing newlines.
pub fn apply(
    content: &str,
    replacements: &IndexMap<String, String>,
    ops: Vec<LineOperation>,
) -> Applied {
    let (content, replacement_counts) = apply_replacements(content, replacements);

    if ops.is_empty() {
        return Applied {
            content,
            replacements: replacement_counts,
            operations: Vec::new(),
            lines_before: None,
        };
    }

    let mut lines = split_lines(&content);
    let lines_before = lines.len();

    let operations = sort_descending(ops)
        .into_iter()
        .map(|op| apply_line_operation(&mut lines, op))
        .collect();

    Applied {
        content: join_lines(&lines),
        replacements: replacement_counts,
        operations,
        lines_before: Some(lines_before),
    }
}
