//! write_file: overwrite or append.

use std::path::Path;
use std::str::FromStr;

use serde::Serialize;
use tokio::io::AsyncWriteExt;

use crate::error::{ToolError, ToolResult};

/// How `write_file` opens the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// `w`: create or truncate.
    Overwrite,
    /// `a`: create or append.
    Append,
}

impl FromStr for WriteMode {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "w" => Ok(Self::Overwrite),
            "a" => Ok(Self::Append),
            other => Err(ToolError::invalid_input(format!(
                "Invalid mode '{other}': use 'w' (overwrite) or 'a' (append)"
            ))),
        }
    }
}

/// Result of `write_file`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes_written: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Write `content` to `path` using `mode` (`"w"` or `"a"`).
#[tracing::instrument(skip(path, content), fields(path = %path.display(), bytes = content.len()), name = "tool.write_file")]
pub async fn write_file(path: &Path, content: &str, mode: &str) -> WriteResult {
    let outcome = match mode.parse::<WriteMode>() {
        Ok(mode) => try_write(path, content, mode).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(bytes_written) => WriteResult {
            success: true,
            bytes_written: Some(bytes_written),
            error: None,
        },
        Err(e) => {
            tracing::warn!(error = %e, "write_file failed");
            WriteResult {
                success: false,
                bytes_written: None,
                error: Some(e.describe("Error writing file")),
            }
        }
    }
}

async fn try_write(path: &Path, content: &str, mode: WriteMode) -> ToolResult<usize> {
    let mut options = tokio::fs::OpenOptions::new();
    options.create(true);
    match mode {
        WriteMode::Overwrite => options.write(true).truncate(true),
        WriteMode::Append => options.append(true),
    };

    let mut file = options.open(path).await?;
    file.write_all(content.as_bytes()).await?;
    file.flush().await?;
    Ok(content.len())
}
