//! execute_shell_command: run an argv with a timeout.
//!
//! Commands are argument vectors, never shell strings. The first element is
//! the program and the rest are passed through unchanged, so there is no
//! shell to inject into.

use std::path::Path;
use std::process::{Output, Stdio};
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::process::Command;

use crate::error::{ToolError, ToolResult};

/// Result of `execute_shell_command`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShellOutput {
    pub stdout: String,
    pub stderr: String,
    /// Process exit code; -1 for timeouts, spawn failures, and signals.
    pub exit_code: i32,
    /// The argv joined with spaces, for display.
    pub command: String,
    pub success: bool,
}

/// Run `command` in `working_dir`, killing it after `timeout_secs`.
#[tracing::instrument(skip(working_dir), name = "tool.execute_shell_command")]
pub async fn execute_shell_command(
    command: &[String],
    timeout_secs: u64,
    working_dir: Option<&Path>,
) -> ShellOutput {
    let display = command.join(" ");
    let start = Instant::now();

    let (program, args) = match command.split_first() {
        Some(split) => split,
        None => {
            let err = ToolError::invalid_input("command must contain at least the program name");
            return failed(display, format!("Error executing command: {err}"));
        }
    };

    match run_captured(program, args, working_dir, Some(Duration::from_secs(timeout_secs))).await {
        Ok(output) => {
            let exit_code = output.status.code().unwrap_or(-1);
            tracing::info!(
                exit_code,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Command completed"
            );
            ShellOutput {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                exit_code,
                command: display,
                success: exit_code == 0,
            }
        }
        Err(e @ ToolError::Timeout { .. }) => {
            tracing::warn!(timeout_secs, "Command timed out");
            failed(display, e.to_string())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Command failed to run");
            failed(display, format!("Error executing command: {e}"))
        }
    }
}

fn failed(command: String, stderr: String) -> ShellOutput {
    ShellOutput {
        stdout: String::new(),
        stderr,
        exit_code: -1,
        command,
        success: false,
    }
}

/// Spawn `program` with piped stdout/stderr and wait for it.
///
/// stdin is closed: the server's own stdin carries the protocol. With a
/// timeout, an overrunning child is killed when its future is dropped.
pub(crate) async fn run_captured(
    program: &str,
    args: &[String],
    working_dir: Option<&Path>,
    timeout: Option<Duration>,
) -> ToolResult<Output> {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = working_dir {
        cmd.current_dir(dir);
    }

    let child = cmd.spawn()?;
    match timeout {
        Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
            Ok(output) => Ok(output?),
            Err(_) => Err(ToolError::Timeout {
                secs: limit.as_secs(),
            }),
        },
        None => Ok(child.wait_with_output().await?),
    }
}
