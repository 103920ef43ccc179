//! search_in_file: regex search over a single file's lines.

use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::error::ToolResult;
use crate::line_ops::split_lines;

use super::read_text;

/// One matching line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    /// 1-based.
    pub line_number: usize,
    pub content: String,
}

/// Result of `search_in_file`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub success: bool,
    pub matches: Vec<SearchMatch>,
    pub match_count: usize,
    pub truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResult {
    fn failure(error: String) -> Self {
        Self {
            success: false,
            matches: Vec::new(),
            match_count: 0,
            truncated: false,
            error: Some(error),
        }
    }
}

/// Search `path` for lines matching `pattern`.
///
/// `max_matches` of zero or less returns every match.
#[tracing::instrument(skip(path), fields(path = %path.display()), name = "tool.search_in_file")]
pub async fn search_in_file(
    path: &Path,
    pattern: &str,
    case_sensitive: bool,
    max_matches: i64,
) -> SearchResult {
    match try_search(path, pattern, case_sensitive, max_matches).await {
        Ok(result) => result,
        Err(e) => {
            tracing::debug!(error = %e, "search_in_file failed");
            SearchResult::failure(e.describe("Error searching file"))
        }
    }
}

async fn try_search(
    path: &Path,
    pattern: &str,
    case_sensitive: bool,
    max_matches: i64,
) -> ToolResult<SearchResult> {
    let content = read_text(path).await?;
    let regex = RegexBuilder::new(pattern)
        .case_insensitive(!case_sensitive)
        .build()?;

    let limit = usize::try_from(max_matches).ok().filter(|&n| n > 0);
    let (matches, truncated) = search_content(&content, &regex, limit);

    Ok(SearchResult {
        success: true,
        match_count: matches.len(),
        matches,
        truncated,
        error: None,
    })
}

/// Collect matching lines up to `limit`.
///
/// `truncated` is set only when the limit was hit and another matching line
/// remains unreported. A file with exactly `limit` matches is not truncated,
/// unlike a plain `matches >= limit` check.
pub fn search_content(content: &str, regex: &Regex, limit: Option<usize>) -> (Vec<SearchMatch>, bool) {
    let mut matches = Vec::new();
    let mut hits = split_lines(content)
        .into_iter()
        .enumerate()
        .filter(|(_, line)| regex.is_match(line));

    for (idx, line) in hits.by_ref() {
        matches.push(SearchMatch {
            line_number: idx + 1,
            content: line,
        });
        if limit.is_some_and(|n| matches.len() >= n) {
            break;
        }
    }

    let truncated = limit.is_some_and(|n| matches.len() >= n) && hits.next().is_some();
    (matches, truncated)
}
