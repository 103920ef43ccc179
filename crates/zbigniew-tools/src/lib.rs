//! Tool handlers for the zbigniew MCP server.
//!
//! Each handler wraps one platform primitive and always returns a structured
//! result; failures become `success: false` with an `error` message rather
//! than propagating.
//!
//! ## Module Structure
//!
//! - `line_ops`: the edit engine (replacements, then ordered line operations)
//! - `file_tools`: show, search, edit, write
//! - `shell`: argv execution with timeout
//! - `fetch`: URL → PDF → text via external collaborators
//! - `config`: TOML server configuration
//! - `error`: `ToolError` taxonomy

pub mod config;
pub mod error;
pub mod fetch;
pub mod file_tools;
pub mod line_ops;
pub mod shell;

pub use config::ServerConfig;
pub use error::{ToolError, ToolResult};
pub use fetch::{CommandExtractor, PageFetcher, TextExtractor};
pub use file_tools::{
    EditRequest, EditResult, SearchMatch, SearchResult, ShowFileResult, WriteMode, WriteResult,
    edit_file, expand_path, search_in_file, show_file, write_file,
};
pub use line_ops::{LineContent, LineOpOutcome, LineOperation};
pub use shell::{ShellOutput, execute_shell_command};
