//! Documentation resources served over MCP.

use std::path::Path;

use serde::Serialize;

use crate::error::{ToolError, ToolResult};

/// A static markdown document exposed as an MCP resource.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocResource {
    /// Resource URI (e.g., "docs://api").
    pub uri: &'static str,
    /// Display name.
    pub name: &'static str,
    /// What the document covers.
    pub description: &'static str,
    /// Always `text/markdown`.
    pub mime_type: &'static str,
    /// File name inside the docs directory.
    #[serde(skip)]
    pub file_name: &'static str,
}

/// All resources, in listing order.
pub const DOC_RESOURCES: &[DocResource] = &[
    DocResource {
        uri: "docs://api",
        name: "API Specification",
        description: "arXiv query API syntax accepted by the send_query tool",
        mime_type: "text/markdown",
        file_name: "API.md",
    },
    DocResource {
        uri: "docs://workflow",
        name: "AI Agent Workflow",
        description: "Step-by-step workflow guide for AI agents to read papers online using read_online and get_image tools",
        mime_type: "text/markdown",
        file_name: "WORKFLOW.md",
    },
];

/// Look up a resource by URI.
#[must_use]
pub fn find(uri: &str) -> Option<&'static DocResource> {
    DOC_RESOURCES.iter().find(|r| r.uri == uri)
}

/// Read a resource's markdown from `docs_dir`.
pub async fn read(uri: &str, docs_dir: &Path) -> ToolResult<(&'static DocResource, String)> {
    let resource = find(uri).ok_or_else(|| ToolError::unavailable(format!("Unknown resource: {uri}")))?;
    let path = docs_dir.join(resource.file_name);

    let text = tokio::fs::read_to_string(&path).await.map_err(|e| {
        tracing::error!(uri, path = %path.display(), error = %e, "Failed to read resource");
        ToolError::unavailable(format!("Could not load {} at {}: {e}", resource.name, path.display()))
    })?;

    Ok((resource, text))
}
