//! show_file: display a window of a file's lines.

use std::path::Path;

use serde::Serialize;

use crate::line_ops::split_lines;

use super::read_text;

/// Result of `show_file`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowFileResult {
    pub success: bool,
    pub content: String,
    pub lines_shown: usize,
    pub total_lines: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ShowFileResult {
    fn failure(error: String, total_lines: usize) -> Self {
        Self {
            success: false,
            content: String::new(),
            lines_shown: 0,
            total_lines,
            start_line: None,
            end_line: None,
            error: Some(error),
        }
    }
}

/// Show `num_lines` lines of `path` starting at 1-based `start_line`.
///
/// `start_line` below 1 is treated as 1. `num_lines` of `None` shows through
/// the end of the file.
#[tracing::instrument(skip(path), fields(path = %path.display()), name = "tool.show_file")]
pub async fn show_file(path: &Path, start_line: i64, num_lines: Option<usize>) -> ShowFileResult {
    match read_text(path).await {
        Ok(content) => window(&content, start_line, num_lines),
        Err(e) => {
            tracing::debug!(error = %e, "show_file failed");
            ShowFileResult::failure(e.describe("Error reading file"), 0)
        }
    }
}

/// Select the requested window from already-loaded content.
pub fn window(content: &str, start_line: i64, num_lines: Option<usize>) -> ShowFileResult {
    let lines = split_lines(content);
    let total_lines = lines.len();
    let start_line = start_line.max(1) as usize;

    if start_line > total_lines {
        return ShowFileResult::failure(
            format!("Start line {start_line} is beyond the file length ({total_lines} lines)"),
            total_lines,
        );
    }

    let start_idx = start_line - 1;
    let end_idx = match num_lines {
        Some(n) => start_idx.saturating_add(n).min(total_lines),
        None => total_lines,
    };
    let selected = &lines[start_idx..end_idx];

    ShowFileResult {
        success: true,
        content: selected.join("\n"),
        lines_shown: selected.len(),
        total_lines,
        start_line: Some(start_line),
        end_line: Some(start_idx + selected.len()),
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIVE: &str = "one\ntwo\nthree\nfour\nfive\n";

    #[test]
    fn test_window_past_end_is_truncated() {
        let result = window(FIVE, 3, Some(10));
        assert!(result.success);
        assert_eq!(result.content, "three\nfour\nfive");
        assert_eq!(result.lines_shown, 3);
        assert_eq!(result.total_lines, 5);
        assert_eq!(result.start_line, Some(3));
        assert_eq!(result.end_line, Some(5));
    }

    #[test]
    fn test_window_defaults_to_whole_file() {
        let result = window(FIVE, 1, None);
        assert_eq!(result.lines_shown, 5);
        assert_eq!(result.content, "one\ntwo\nthree\nfour\nfive");
    }

    #[test]
    fn test_window_clamps_start() {
        let result = window(FIVE, -3, Some(2));
        assert_eq!(result.start_line, Some(1));
        assert_eq!(result.content, "one\ntwo");
    }

    #[test]
    fn test_window_zero_lines() {
        let result = window(FIVE, 2, Some(0));
        assert!(result.success);
        assert_eq!(result.lines_shown, 0);
        assert_eq!(result.content, "");
        assert_eq!(result.end_line, Some(1));
    }

    #[test]
    fn test_window_start_beyond_end() {
        let result = window(FIVE, 6, None);
        assert!(!result.success);
        assert_eq!(result.total_lines, 5);
        assert_eq!(
            result.error.as_deref(),
            Some("Start line 6 is beyond the file length (5 lines)")
        );
    }

    #[tokio::test]
    async fn test_show_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");
        let result = show_file(&path, 1, None).await;
        assert!(!result.success);
        assert!(result.error.unwrap().ends_with("does not exist"));
        assert_eq!(result.total_lines, 0);
    }

    #[tokio::test]
    async fn test_show_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("five.txt");
        std::fs::write(&path, FIVE).unwrap();

        let result = show_file(&path, 2, Some(2)).await;
        assert!(result.success);
        assert_eq!(result.content, "two\nthree");

        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["lines_shown"], 2);
    }
}
