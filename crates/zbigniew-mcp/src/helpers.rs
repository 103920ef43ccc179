//! Conversions from request models to tool inputs, and output encoding.

use serde::Serialize;
use zbigniew_tools::{EditRequest, LineContent, LineOperation, expand_path};

use crate::models::{EditFileRequest, LineOperationRequest, OperationContent};

// ============================================================================
// Parsing Helpers
// ============================================================================

impl From<OperationContent> for LineContent {
    fn from(content: OperationContent) -> Self {
        match content {
            OperationContent::Line(line) => LineContent::Single(line),
            OperationContent::Lines(lines) => LineContent::Many(lines),
        }
    }
}

/// Parse a line operation. The kind is matched case-insensitively; anything
/// unrecognized becomes [`LineOperation::Unknown`] so it can be reported.
pub fn parse_line_operation(req: LineOperationRequest) -> LineOperation {
    let kind = req.operation.to_lowercase();
    let content = req.content.map(LineContent::from).unwrap_or_default();

    match kind.as_str() {
        "insert" => LineOperation::Insert {
            line: req.line.unwrap_or(0),
            content,
        },
        "replace" => LineOperation::Replace {
            line: req.line.unwrap_or(0),
            content: content.into_joined(),
        },
        "delete" => LineOperation::Delete {
            start_line: req.start_line.unwrap_or(0),
            end_line: req.end_line,
        },
        _ => LineOperation::Unknown {
            line: req.line.or(req.start_line),
            kind,
        },
    }
}

/// Build the tool input for `edit_file`.
pub fn edit_request(req: EditFileRequest) -> EditRequest {
    EditRequest {
        path: expand_path(&req.file_path),
        replacements: req.replacements.unwrap_or_default(),
        line_operations: req
            .line_operations
            .unwrap_or_default()
            .into_iter()
            .map(parse_line_operation)
            .collect(),
        create_if_missing: req.create_if_missing,
    }
}

// ============================================================================
// Output
// ============================================================================

/// Serialize a tool result as JSON text.
pub fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        serde_json::json!({
            "success": false,
            "error": format!("Error encoding result: {e}"),
        })
        .to_string()
    })
}
