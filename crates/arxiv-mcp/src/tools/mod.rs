//! MCP tool implementations.
//!
//! Each tool module provides a unit struct that:
//! 1. Parses and validates its input arguments
//! 2. Calls the arXiv client
//! 3. Returns plain text (feed XML, page HTML, or a status line)

mod images;
mod papers;
mod search;

pub use images::GetImageTool;
pub use papers::{DownloadPaperTool, ReadOnlineTool};
pub use search::SendQueryTool;

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::client::ArxivClient;
use crate::config::Config;
use crate::error::{ToolError, ToolResult};

/// Tool execution context.
pub struct ToolContext {
    /// API client.
    pub client: Arc<ArxivClient>,

    /// Server configuration (download and docs locations).
    pub config: Arc<Config>,
}

impl ToolContext {
    /// Create a new tool context.
    #[must_use]
    pub fn new(client: Arc<ArxivClient>, config: Arc<Config>) -> Self {
        Self { client, config }
    }
}

/// Trait for MCP tools.
#[async_trait::async_trait]
pub trait McpTool: Send + Sync {
    /// Tool name (e.g., "send_query").
    fn name(&self) -> &'static str;

    /// Short human-readable title.
    fn title(&self) -> &'static str;

    /// Tool description for LLM.
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters.
    fn input_schema(&self) -> serde_json::Value;

    /// Execute the tool with given input.
    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String>;
}

/// Register all tools.
#[must_use]
pub fn register_all_tools() -> Vec<Box<dyn McpTool>> {
    vec![
        Box::new(search::SendQueryTool),
        Box::new(papers::DownloadPaperTool),
        Box::new(papers::ReadOnlineTool),
        Box::new(images::GetImageTool),
    ]
}

/// Deserialize tool arguments, reporting a missing `required` string argument by name.
fn parse_input<T: DeserializeOwned>(
    input: serde_json::Value,
    required: &'static str,
) -> ToolResult<T> {
    if !input.get(required).is_some_and(serde_json::Value::is_string) {
        return Err(ToolError::MissingArgument(required));
    }
    Ok(serde_json::from_value(input)?)
}

/// Write `bytes` to `path`, creating parent directories first.
async fn save_bytes(path: &Path, bytes: &[u8]) -> ToolResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_tool_names() {
        let names: Vec<&str> = register_all_tools().iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["send_query", "download_paper", "read_online", "get_image"]);
    }

    #[test]
    fn test_schemas_require_their_argument() {
        for tool in register_all_tools() {
            let schema = tool.input_schema();
            assert_eq!(schema["type"], "object");
            assert!(!schema["required"].as_array().unwrap().is_empty(), "{}", tool.name());
        }
    }

    #[test]
    fn test_parse_input_missing_argument() {
        let result: ToolResult<crate::models::SendQueryInput> =
            parse_input(serde_json::json!({"q": "x"}), "query");
        assert!(matches!(result, Err(ToolError::MissingArgument("query"))));

        let result: ToolResult<crate::models::SendQueryInput> =
            parse_input(serde_json::json!({"query": 5}), "query");
        assert!(matches!(result, Err(ToolError::MissingArgument("query"))));
    }

    #[tokio::test]
    async fn test_save_bytes_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/file.bin");
        save_bytes(&path, b"%PDF-1.5").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.5");
    }
}
