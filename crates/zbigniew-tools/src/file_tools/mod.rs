//! File-level tools: show, search, edit, write.
//!
//! Every handler reads and writes the host filesystem directly and reports
//! through its own structured result type. Paths may start with `~`.

pub mod edit;
pub mod search;
pub mod show;
pub mod write;

use std::io;
use std::path::{Path, PathBuf};

use crate::error::{ToolError, ToolResult};

pub use edit::{EditRequest, EditResult, edit_file};
pub use search::{SearchMatch, SearchResult, search_in_file};
pub use show::{ShowFileResult, show_file};
pub use write::{WriteMode, WriteResult, write_file};

/// Expand a leading `~` to the home directory.
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Read a whole file as UTF-8, mapping a missing file to [`ToolError::NotFound`].
pub async fn read_text(path: &Path) -> ToolResult<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(ToolError::not_found(path)),
        Err(e) => Err(e.into()),
    }
}
