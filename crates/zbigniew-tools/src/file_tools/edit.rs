//! edit_file: string replacements and line operations, written back in one go.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{ToolError, ToolResult};
use crate::line_ops::{self, LineOpOutcome, LineOperation};

/// Inputs for one `edit_file` call.
#[derive(Debug, Clone, Default)]
pub struct EditRequest {
    pub path: PathBuf,
    /// Applied first, in order, to the raw content.
    pub replacements: IndexMap<String, String>,
    pub line_operations: Vec<LineOperation>,
    /// Create the file (and parent directories) when it does not exist.
    pub create_if_missing: bool,
}

/// Result of `edit_file`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditResult {
    pub success: bool,
    /// Bytes before editing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_size: Option<usize>,
    /// Bytes written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changed: Option<bool>,
    pub replacements_made: IndexMap<String, usize>,
    pub line_operations_performed: Vec<LineOpOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EditResult {
    fn failure(error: String) -> Self {
        Self {
            success: false,
            original_size: None,
            new_size: None,
            changed: None,
            replacements_made: IndexMap::new(),
            line_operations_performed: Vec::new(),
            error: Some(error),
        }
    }
}

/// Edit a file in place.
///
/// The whole new content is written with a single overwrite even when
/// nothing changed. Individual line-operation failures are reported in
/// `line_operations_performed` and do not fail the call.
#[tracing::instrument(skip_all, fields(path = %req.path.display()), name = "tool.edit_file")]
pub async fn edit_file(req: EditRequest) -> EditResult {
    match try_edit(req).await {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(error = %e, "edit_file failed");
            EditResult::failure(e.describe("Error editing file"))
        }
    }
}

async fn try_edit(req: EditRequest) -> ToolResult<EditResult> {
    let EditRequest {
        path,
        replacements,
        line_operations,
        create_if_missing,
    } = req;

    if !tokio::fs::try_exists(&path).await? {
        if !create_if_missing {
            return Err(ToolError::not_found(&path));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, "").await?;
        tracing::info!(path = %path.display(), "Created empty file");
    }

    let original = tokio::fs::read_to_string(&path).await?;
    let applied = line_ops::apply(&original, &replacements, line_operations);

    tokio::fs::write(&path, &applied.content).await?;

    tracing::debug!(
        replacements = applied.replacements.len(),
        operations = applied.operations.len(),
        lines_before = ?applied.lines_before,
        "Edit applied"
    );

    Ok(EditResult {
        success: true,
        original_size: Some(original.len()),
        new_size: Some(applied.content.len()),
        changed: Some(original != applied.content),
        replacements_made: applied.replacements,
        line_operations_performed: applied.operations,
        error: None,
    })
}
