//! Tool error types.
//!
//! Handlers never surface these to the caller as faults. Each handler turns
//! a `ToolError` into its own structured result with `success: false` and the
//! error's display text.

use std::io;
use std::path::Path;
use thiserror::Error;

/// Error raised while running a tool.
#[derive(Debug, Error)]
pub enum ToolError {
    /// File or directory does not exist.
    #[error("File {0} does not exist")]
    NotFound(String),

    /// Bad arguments: out-of-range lines, unknown modes, empty commands.
    #[error("{0}")]
    InvalidInput(String),

    /// Regex failed to compile.
    #[error("Invalid regular expression: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Subprocess exceeded its time budget.
    #[error("Command timed out after {secs} seconds")]
    Timeout {
        /// Budget that was exceeded.
        secs: u64,
    },

    /// Subprocess exited with a nonzero status.
    #[error("{program} exited with status {code}: {stderr}")]
    ExternalProcess {
        /// Program that failed.
        program: String,
        /// Exit code, -1 when terminated by a signal.
        code: i32,
        /// Captured standard error.
        stderr: String,
    },

    /// Read, write, or permission error.
    #[error("{0}")]
    Io(#[from] io::Error),
}

impl ToolError {
    /// Create a NotFound error for a path.
    pub fn not_found(path: impl AsRef<Path>) -> Self {
        Self::NotFound(path.as_ref().display().to_string())
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an ExternalProcess error.
    pub fn external_process(program: impl Into<String>, code: i32, stderr: impl Into<String>) -> Self {
        Self::ExternalProcess {
            program: program.into(),
            code,
            stderr: stderr.into(),
        }
    }

    /// Message for a structured result.
    ///
    /// Errors that already read as complete sentences pass through; I/O and
    /// process failures get `context` as a prefix.
    pub fn describe(&self, context: &str) -> String {
        match self {
            Self::NotFound(_) | Self::InvalidInput(_) | Self::InvalidPattern(_) | Self::Timeout { .. } => {
                self.to_string()
            }
            Self::Io(e) if e.kind() == io::ErrorKind::NotFound => self.to_string(),
            _ => format!("{context}: {self}"),
        }
    }
}

/// Tool result type.
pub type ToolResult<T> = Result<T, ToolError>;
