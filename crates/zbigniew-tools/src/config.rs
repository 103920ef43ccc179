//! Server configuration.
//!
//! Loaded once at startup from TOML and shared read-only by every tool call.
//! Location: `$XDG_CONFIG_HOME/zbigniew/config.toml` unless `--config` is given.
//!
//! ```toml
//! [shell]
//! default_timeout_secs = 60
//!
//! [search]
//! default_max_matches = 100
//!
//! [fetch]
//! browser = "chromium"
//! browser_args = ["--headless", "--disable-gpu", "--print-to-pdf={output}", "{url}"]
//! extractor = "pdftotext"
//! extractor_args = ["{input}", "-"]
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Placeholder for the rendered PDF path in browser args.
pub const OUTPUT_PLACEHOLDER: &str = "{output}";
/// Placeholder for the page URL in browser args.
pub const URL_PLACEHOLDER: &str = "{url}";
/// Placeholder for the PDF path in extractor args.
pub const INPUT_PLACEHOLDER: &str = "{input}";

/// Complete configuration for the tool server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub shell: ShellConfig,
    pub search: SearchConfig,
    pub fetch: FetchConfig,
}

/// Shell execution defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Timeout applied when a call omits one.
    pub default_timeout_secs: u64,
}

/// Regex search defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Match cap applied when a call omits one. Zero or negative is unlimited.
    pub default_max_matches: i64,
}

/// Page fetch collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Headless browser binary.
    pub browser: String,
    /// Browser argument template; `{output}` and `{url}` are substituted.
    pub browser_args: Vec<String>,
    /// PDF-to-text converter binary.
    pub extractor: String,
    /// Converter argument template; `{input}` is substituted.
    pub extractor_args: Vec<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            default_timeout_secs: 60,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_max_matches: 100,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            browser: "chromium".to_string(),
            browser_args: vec![
                "--headless".to_string(),
                "--disable-gpu".to_string(),
                format!("--print-to-pdf={OUTPUT_PLACEHOLDER}"),
                URL_PLACEHOLDER.to_string(),
            ],
            extractor: "pdftotext".to_string(),
            extractor_args: vec![INPUT_PLACEHOLDER.to_string(), "-".to_string()],
        }
    }
}

impl ServerConfig {
    /// Default config file path.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("zbigniew").join("config.toml"))
    }

    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid config TOML")
    }

    /// Load from an explicit path. The file must exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&text)
    }

    /// Load from `path` if given, else the default path if it exists, else defaults.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "Loading config");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}
