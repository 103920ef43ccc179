//! MCP server exposing shell, file and page-fetch tools.
//!
//! Gives agent clients controlled access to the local machine over stdio:
//! running commands, viewing, searching, editing and writing files, and
//! fetching web pages as plain text.
//!
//! ## Module Structure
//!
//! - `models`: Request types for MCP tools
//! - `helpers`: Request parsing and result encoding

mod helpers;
mod models;

use std::sync::Arc;

use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};

use zbigniew_tools::{PageFetcher, ServerConfig, expand_path};

// Re-export public types
pub use models::*;
use helpers::*;

/// MCP server exposing local tools.
#[derive(Clone)]
pub struct ZbigniewMcp {
    config: Arc<ServerConfig>,
    fetcher: PageFetcher,
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for ZbigniewMcp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZbigniewMcp")
            .field("config", &self.config)
            .field("fetcher", &self.fetcher)
            .field("tool_router", &self.tool_router)
            .finish()
    }
}

impl ZbigniewMcp {
    /// Create a server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        let fetcher = PageFetcher::new(config.fetch.clone());
        Self::with_fetcher(config, fetcher)
    }

    /// Create a server with a custom page fetcher.
    pub fn with_fetcher(config: ServerConfig, fetcher: PageFetcher) -> Self {
        Self {
            config: Arc::new(config),
            fetcher,
            tool_router: Self::tool_router(),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

impl Default for ZbigniewMcp {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}

#[tool_router]
impl ZbigniewMcp {
    // ========================================================================
    // Shell
    // ========================================================================

    #[tool(description = "Execute a command and return its output. The command is a list of strings (program first, then arguments) and is not interpreted by a shell. Returns stdout, stderr, exit_code, command and success. Times out after 'timeout' seconds (default 60).")]
    #[tracing::instrument(skip(self, req), name = "mcp.execute_shell_command")]
    async fn execute_shell_command(&self, Parameters(req): Parameters<ExecuteShellCommandRequest>) -> String {
        let timeout = req.timeout.unwrap_or(self.config.shell.default_timeout_secs);
        let working_dir = req.working_dir.as_deref().map(expand_path);
        let output = zbigniew_tools::execute_shell_command(&req.command, timeout, working_dir.as_deref()).await;
        to_json(&output)
    }

    // ========================================================================
    // Files
    // ========================================================================

    #[tool(description = "Show lines from a file. Starts at start_line (1-based, default 1) and shows num_lines lines, or through the end of the file. Returns content, lines_shown, total_lines, start_line and end_line.")]
    #[tracing::instrument(skip(self, req), name = "mcp.show_file")]
    async fn show_file(&self, Parameters(req): Parameters<ShowFileRequest>) -> String {
        let path = expand_path(&req.file_path);
        let result = zbigniew_tools::show_file(&path, req.start_line, req.num_lines).await;
        to_json(&result)
    }

    #[tool(description = "Search a file for lines matching a regular expression. Returns matches with 1-based line_number and line content, match_count, and truncated when more matches exist beyond max_matches (default 100, -1 for all).")]
    #[tracing::instrument(skip(self, req), name = "mcp.search_in_file")]
    async fn search_in_file(&self, Parameters(req): Parameters<SearchInFileRequest>) -> String {
        let path = expand_path(&req.file_path);
        let max_matches = req.max_matches.unwrap_or(self.config.search.default_max_matches);
        let result =
            zbigniew_tools::search_in_file(&path, &req.pattern, req.case_sensitive, max_matches).await;
        to_json(&result)
    }

    #[tool(description = "Edit a file with a single read and a single whole-file overwrite. First applies exact string 'replacements' (every occurrence, in the given order), then 'line_operations' (insert, replace, delete) ordered from the highest line down, so each line number refers to the file as it was after replacements. Set create_if_missing to create the file. Returns original_size, new_size, changed, replacements_made and a report per line operation.")]
    #[tracing::instrument(skip(self, req), name = "mcp.edit_file")]
    async fn edit_file(&self, Parameters(req): Parameters<EditFileRequest>) -> String {
        let result = zbigniew_tools::edit_file(edit_request(req)).await;
        to_json(&result)
    }

    #[tool(description = "Write text to a file. Mode 'w' (default) creates or overwrites; 'a' creates or appends. The parent directory must exist. Returns bytes_written.")]
    #[tracing::instrument(skip(self, req), name = "mcp.write_file")]
    async fn write_file(&self, Parameters(req): Parameters<WriteFileRequest>) -> String {
        let path = expand_path(&req.file_path);
        let result = zbigniew_tools::write_file(&path, &req.content, &req.mode).await;
        to_json(&result)
    }

    // ========================================================================
    // Web
    // ========================================================================

    #[tool(description = "Fetch a web page and return its text content. The page is rendered by a headless browser, so JavaScript-generated content is included. Returns plain text, or a message starting with 'Error fetching page:'.")]
    #[tracing::instrument(skip(self, req), name = "mcp.fetch_page")]
    async fn fetch_page(&self, Parameters(req): Parameters<FetchPageRequest>) -> String {
        self.fetcher.fetch(&req.url).await
    }
}

#[tool_handler]
impl ServerHandler for ZbigniewMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build()).with_instructions(
            "Local tools for agents: execute_shell_command runs a program with arguments; show_file, search_in_file, edit_file and write_file read and modify files; fetch_page returns a web page as text. Results are JSON objects with a 'success' flag and an 'error' message on failure.",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use serde_json::Value;

    fn parse(result: &str) -> Value {
        serde_json::from_str(result).unwrap()
    }

    fn path_str(path: &std::path::Path) -> String {
        path.display().to_string()
    }

    fn op(json: Value) -> LineOperationRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_tool_list() {
        let mcp = ZbigniewMcp::default();
        let mut names: Vec<String> = mcp
            .tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "edit_file",
                "execute_shell_command",
                "fetch_page",
                "search_in_file",
                "show_file",
                "write_file",
            ]
        );
    }

    #[test]
    fn test_edit_file_description_names_overwrite() {
        let mcp = ZbigniewMcp::default();
        let tool = mcp
            .tool_router
            .list_all()
            .into_iter()
            .find(|t| t.name == "edit_file")
            .unwrap();
        let description = tool.description.unwrap();
        assert!(description.contains("whole-file overwrite"));
        assert!(!description.contains("atomic"));
    }

    #[test]
    fn test_get_info_advertises_tools() {
        let info = ZbigniewMcp::default().get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.unwrap().contains("edit_file"));
    }

    #[tokio::test]
    async fn test_write_then_show() {
        let dir = tempfile::tempdir().unwrap();
        let file = path_str(&dir.path().join("notes.txt"));
        let mcp = ZbigniewMcp::default();

        let result = parse(
            &mcp.write_file(Parameters(WriteFileRequest {
                file_path: file.clone(),
                content: "one\ntwo\nthree\n".into(),
                mode: "w".into(),
            }))
            .await,
        );
        assert_eq!(result["success"], true);
        assert_eq!(result["bytes_written"], 14);

        let result = parse(
            &mcp.show_file(Parameters(ShowFileRequest {
                file_path: file,
                start_line: 2,
                num_lines: Some(1),
            }))
            .await,
        );
        assert_eq!(result["success"], true);
        assert_eq!(result["content"], "two");
        assert_eq!(result["lines_shown"], 1);
        assert_eq!(result["total_lines"], 3);
        assert_eq!(result["start_line"], 2);
        assert_eq!(result["end_line"], 2);
    }

    #[tokio::test]
    async fn test_show_missing_file() {
        let mcp = ZbigniewMcp::default();
        let result = parse(
            &mcp.show_file(Parameters(ShowFileRequest {
                file_path: "/nonexistent/zbigniew/file.txt".into(),
                start_line: 1,
                num_lines: None,
            }))
            .await,
        );
        assert_eq!(result["success"], false);
        assert_eq!(result["error"], "File /nonexistent/zbigniew/file.txt does not exist");
    }

    #[tokio::test]
    async fn test_search_uses_configured_default_cap() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("log.txt");
        std::fs::write(&file, "hit\nhit\nhit\nmiss\n").unwrap();

        let mut config = ServerConfig::default();
        config.search.default_max_matches = 2;
        let mcp = ZbigniewMcp::new(config);

        let result = parse(
            &mcp.search_in_file(Parameters(SearchInFileRequest {
                file_path: path_str(&file),
                pattern: "HIT".into(),
                case_sensitive: false,
                max_matches: None,
            }))
            .await,
        );
        assert_eq!(result["success"], true);
        assert_eq!(result["match_count"], 2);
        assert_eq!(result["truncated"], true);
        assert_eq!(result["matches"][0]["line_number"], 1);
        assert_eq!(result["matches"][0]["content"], "hit");
    }

    #[tokio::test]
    async fn test_search_invalid_regex() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, "text\n").unwrap();

        let mcp = ZbigniewMcp::default();
        let result = parse(
            &mcp.search_in_file(Parameters(SearchInFileRequest {
                file_path: path_str(&file),
                pattern: "(".into(),
                case_sensitive: true,
                max_matches: Some(-1),
            }))
            .await,
        );
        assert_eq!(result["success"], false);
        assert!(result["error"].as_str().unwrap().starts_with("Invalid regular expression"));
    }

    #[tokio::test]
    async fn test_edit_replacements_then_descending_line_ops() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("code.txt");
        std::fs::write(&file, "alpha\nbeta\ngamma\ndelta").unwrap();

        let mut replacements = IndexMap::new();
        replacements.insert("beta".to_string(), "BETA".to_string());

        let mcp = ZbigniewMcp::default();
        let result = parse(
            &mcp.edit_file(Parameters(EditFileRequest {
                file_path: path_str(&file),
                replacements: Some(replacements),
                line_operations: Some(vec![
                    op(serde_json::json!({"operation": "insert", "line": 1, "content": "header"})),
                    op(serde_json::json!({"operation": "delete", "start_line": 3})),
                    op(serde_json::json!({"operation": "replace", "line": 2, "content": "BETA!"})),
                ]),
                create_if_missing: false,
            }))
            .await,
        );

        assert_eq!(result["success"], true);
        assert_eq!(result["changed"], true);
        assert_eq!(result["replacements_made"]["beta"], 1);

        // Applied highest line first: delete 3, replace 2, insert 1.
        let ops = result["line_operations_performed"].as_array().unwrap();
        assert_eq!(ops[0]["operation"], "delete");
        assert_eq!(ops[0]["deleted_content"], serde_json::json!(["gamma"]));
        assert_eq!(ops[1]["operation"], "replace");
        assert_eq!(ops[1]["old_content"], "BETA");
        assert_eq!(ops[2]["operation"], "insert");

        let content = std::fs::read_to_string(&file).unwrap();
        assert_eq!(content, "header\nalpha\nBETA!\ndelta");
    }

    #[tokio::test]
    async fn test_edit_replacements_run_in_caller_order() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("chain.txt");
        std::fs::write(&file, "a").unwrap();

        // "b" -> "c" runs first and finds nothing; then "a" -> "b".
        let text = format!(
            r#"{{"file_path": {}, "replacements": {{"b": "c", "a": "b"}}}}"#,
            serde_json::to_string(&path_str(&file)).unwrap()
        );
        let args: rmcp::model::JsonObject = serde_json::from_str(&text).unwrap();
        let req: EditFileRequest = serde_json::from_value(Value::Object(args)).unwrap();

        let result = parse(&ZbigniewMcp::default().edit_file(Parameters(req)).await);
        assert_eq!(result["success"], true);
        assert_eq!(result["replacements_made"], serde_json::json!({"a": 1}));
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "b");
    }

    #[tokio::test]
    async fn test_edit_create_if_missing() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("new/dir/file.txt");

        let mcp = ZbigniewMcp::default();
        let result = parse(
            &mcp.edit_file(Parameters(EditFileRequest {
                file_path: path_str(&file),
                replacements: None,
                line_operations: Some(vec![op(
                    serde_json::json!({"operation": "insert", "line": 1, "content": ["a", "b"]}),
                )]),
                create_if_missing: true,
            }))
            .await,
        );
        assert_eq!(result["success"], true);
        assert_eq!(result["original_size"], 0);
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "a\nb");
    }

    #[tokio::test]
    async fn test_edit_unknown_operation_reported() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f.txt");
        std::fs::write(&file, "x\ny").unwrap();

        let mcp = ZbigniewMcp::default();
        let result = parse(
            &mcp.edit_file(Parameters(EditFileRequest {
                file_path: path_str(&file),
                replacements: None,
                line_operations: Some(vec![op(serde_json::json!({"operation": "swap", "line": 1}))]),
                create_if_missing: false,
            }))
            .await,
        );
        assert_eq!(result["success"], true);
        assert_eq!(result["changed"], false);
        let report = &result["line_operations_performed"][0];
        assert_eq!(report["success"], false);
        assert_eq!(report["error"], "Unknown operation type: swap");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_execute_shell_command() {
        let dir = tempfile::tempdir().unwrap();
        let mcp = ZbigniewMcp::default();

        let result = parse(
            &mcp.execute_shell_command(Parameters(ExecuteShellCommandRequest {
                command: vec!["pwd".into()],
                timeout: None,
                working_dir: Some(path_str(dir.path())),
            }))
            .await,
        );
        assert_eq!(result["success"], true);
        assert_eq!(result["exit_code"], 0);
        assert_eq!(result["command"], "pwd");
        let expected = dir.path().canonicalize().unwrap();
        let reported = std::path::PathBuf::from(result["stdout"].as_str().unwrap().trim_end());
        assert_eq!(reported.canonicalize().unwrap(), expected);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_execute_shell_command_uses_configured_timeout() {
        let mut config = ServerConfig::default();
        config.shell.default_timeout_secs = 1;
        let mcp = ZbigniewMcp::new(config);

        let result = parse(
            &mcp.execute_shell_command(Parameters(ExecuteShellCommandRequest {
                command: vec!["sleep".into(), "5".into()],
                timeout: None,
                working_dir: None,
            }))
            .await,
        );
        assert_eq!(result["success"], false);
        assert_eq!(result["exit_code"], -1);
        assert_eq!(result["stderr"], "Command timed out after 1 seconds");
    }

    #[tokio::test]
    async fn test_fetch_page_error_is_text() {
        let mut config = ServerConfig::default();
        config.fetch.browser = "definitely-not-a-browser-zz".into();
        let mcp = ZbigniewMcp::new(config);

        let text = mcp
            .fetch_page(Parameters(FetchPageRequest { url: "https://example.test".into() }))
            .await;
        assert!(text.starts_with("Error fetching page:"));
    }
}
