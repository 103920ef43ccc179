//! fetch_page: render a URL to PDF in a headless browser, then extract text.
//!
//! Both steps are external collaborators. The browser is launched from an
//! argument template in [`FetchConfig`]; text extraction goes through the
//! [`TextExtractor`] trait, backed by a converter command by default.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{FetchConfig, INPUT_PLACEHOLDER, OUTPUT_PLACEHOLDER, URL_PLACEHOLDER};
use crate::error::{ToolError, ToolResult};
use crate::shell::run_captured;

/// Turns a rendered PDF into plain text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, pdf: &Path) -> ToolResult<String>;
}

/// Extractor that runs a converter program and reads its stdout.
#[derive(Debug, Clone)]
pub struct CommandExtractor {
    program: String,
    args: Vec<String>,
}

impl CommandExtractor {
    /// `args` may contain `{input}` for the PDF path.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

#[async_trait]
impl TextExtractor for CommandExtractor {
    async fn extract(&self, pdf: &Path) -> ToolResult<String> {
        let input = pdf.display().to_string();
        let args = substitute(&self.args, &[(INPUT_PLACEHOLDER, input.as_str())]);
        let output = run_captured(&self.program, &args, None, None).await?;
        if !output.status.success() {
            return Err(ToolError::external_process(
                &self.program,
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr).trim_end(),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Fetches pages as text.
#[derive(Clone)]
pub struct PageFetcher {
    config: FetchConfig,
    extractor: Arc<dyn TextExtractor>,
}

impl std::fmt::Debug for PageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageFetcher")
            .field("browser", &self.config.browser)
            .field("extractor", &self.config.extractor)
            .finish()
    }
}

impl PageFetcher {
    /// Fetcher using the configured browser and converter command.
    pub fn new(config: FetchConfig) -> Self {
        let extractor = Arc::new(CommandExtractor::new(
            config.extractor.clone(),
            config.extractor_args.clone(),
        ));
        Self { config, extractor }
    }

    /// Fetcher with a custom text extractor.
    pub fn with_extractor(config: FetchConfig, extractor: Arc<dyn TextExtractor>) -> Self {
        Self { config, extractor }
    }

    /// Fetch `url` as plain text, or an `Error fetching page: ...` string.
    #[tracing::instrument(skip(self), name = "tool.fetch_page")]
    pub async fn fetch(&self, url: &str) -> String {
        match self.try_fetch(url).await {
            Ok(text) => {
                tracing::info!(chars = text.len(), "Page fetched");
                text
            }
            Err(e) => {
                tracing::warn!(error = %e, "fetch_page failed");
                format!("Error fetching page: {e}")
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> ToolResult<String> {
        if url.trim().is_empty() {
            return Err(ToolError::invalid_input("url is empty"));
        }

        // Closed on creation so the browser can write to it; removed when dropped.
        let pdf = tempfile::Builder::new()
            .prefix("page")
            .suffix(".pdf")
            .tempfile()?
            .into_temp_path();
        let output_path = pdf.display().to_string();

        let args = substitute(
            &self.config.browser_args,
            &[(OUTPUT_PLACEHOLDER, output_path.as_str()), (URL_PLACEHOLDER, url)],
        );
        let output = run_captured(&self.config.browser, &args, None, None).await?;
        if !output.status.success() {
            return Err(ToolError::external_process(
                &self.config.browser,
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr).trim_end(),
            ));
        }

        self.extractor.extract(&pdf).await
    }
}

/// Replace every placeholder occurrence in each template arg.
fn substitute(template: &[String], values: &[(&str, &str)]) -> Vec<String> {
    template
        .iter()
        .map(|arg| {
            values
                .iter()
                .fold(arg.clone(), |acc, &(key, value)| acc.replace(key, value))
        })
        .collect()
}
