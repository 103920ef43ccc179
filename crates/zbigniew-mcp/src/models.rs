//! MCP request types.
//!
//! These define the argument schemas advertised for each tool. Results are
//! the structured types from `zbigniew_tools`, serialized to JSON text.

use indexmap::IndexMap;
use rmcp::schemars;
use serde::Deserialize;

// ============================================================================
// Shell
// ============================================================================

/// Run a command given as an argument vector.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExecuteShellCommandRequest {
    /// Program followed by its arguments
    #[schemars(description = "Command as a list of strings: program first, then each argument (e.g. [\"ls\", \"-la\"]). Not interpreted by a shell.")]
    pub command: Vec<String>,
    /// Timeout in seconds
    #[schemars(description = "Timeout in seconds (default: 60)")]
    pub timeout: Option<u64>,
    /// Working directory
    #[schemars(description = "Working directory to run the command in (default: server's current directory)")]
    pub working_dir: Option<String>,
}

// ============================================================================
// File Tools
// ============================================================================

/// Show a range of lines from a file.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ShowFileRequest {
    #[schemars(description = "Path to the file to display")]
    pub file_path: String,
    #[schemars(description = "Line number to start from (1-based, default: 1)")]
    #[serde(default = "default_start_line")]
    pub start_line: i64,
    #[schemars(description = "Number of lines to display (default: through end of file)")]
    pub num_lines: Option<usize>,
}

fn default_start_line() -> i64 {
    1
}

/// Search a file with a regular expression.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchInFileRequest {
    #[schemars(description = "Path to the file to search")]
    pub file_path: String,
    #[schemars(description = "Regular expression to search for")]
    pub pattern: String,
    #[schemars(description = "Whether the search is case-sensitive (default: true)")]
    #[serde(default = "default_true")]
    pub case_sensitive: bool,
    #[schemars(description = "Maximum matches to return (default: 100, use -1 for all matches)")]
    pub max_matches: Option<i64>,
}

fn default_true() -> bool {
    true
}

/// Content for an insert or replace: a single line or a list of lines.
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
#[serde(untagged)]
pub enum OperationContent {
    Line(String),
    Lines(Vec<String>),
}

/// One line operation. `operation` selects which other fields apply.
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct LineOperationRequest {
    #[schemars(description = "Operation type: insert, replace, or delete")]
    #[serde(default)]
    pub operation: String,
    #[schemars(description = "Target line for insert/replace (1-based). Insert places content before this line; past the end appends.")]
    pub line: Option<i64>,
    #[schemars(description = "First line to delete (1-based)")]
    pub start_line: Option<i64>,
    #[schemars(description = "Last line to delete, inclusive (default: start_line)")]
    pub end_line: Option<i64>,
    #[schemars(description = "Content for insert/replace: a string, or a list of lines")]
    pub content: Option<OperationContent>,
}

/// Edit a file with string replacements and line operations.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EditFileRequest {
    #[schemars(description = "Path to the file to edit")]
    pub file_path: String,
    #[schemars(description = "Exact strings to replace, mapped to their replacements. Applied first, in order, to every occurrence.")]
    #[serde(default)]
    pub replacements: Option<IndexMap<String, String>>,
    #[schemars(description = "Line operations. Line numbers refer to the file after replacements; operations are applied from the highest line down.")]
    #[serde(default)]
    pub line_operations: Option<Vec<LineOperationRequest>>,
    #[schemars(description = "Create the file and any parent directories if it does not exist (default: false)")]
    #[serde(default)]
    pub create_if_missing: bool,
}

/// Write or append content to a file.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct WriteFileRequest {
    #[schemars(description = "Path to the file to write")]
    pub file_path: String,
    #[schemars(description = "Text content to write")]
    pub content: String,
    #[schemars(description = "Write mode: 'w' (overwrite, default) or 'a' (append)")]
    #[serde(default = "default_write_mode")]
    pub mode: String,
}

fn default_write_mode() -> String {
    "w".to_string()
}

// ============================================================================
// Web
// ============================================================================

/// Fetch a web page as text.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FetchPageRequest {
    #[schemars(description = "URL of the web page to fetch")]
    pub url: String,
}
