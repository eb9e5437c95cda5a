//! Paper tools: download_paper, read_online.

use std::path::PathBuf;

use serde_json::json;

use super::{McpTool, ToolContext, parse_input, save_bytes};
use crate::error::{ClientError, ToolError, ToolResult};
use crate::models::{DownloadPaperInput, ReadOnlineInput};
use crate::validation::validate_arxiv_id;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// PDF download tool.
pub struct DownloadPaperTool;

#[async_trait::async_trait]
impl McpTool for DownloadPaperTool {
    fn name(&self) -> &'static str {
        "download_paper"
    }

    fn title(&self) -> &'static str {
        "Download arXiv Paper PDF"
    }

    fn description(&self) -> &'static str {
        "Download a paper PDF from arXiv by its ID. Saves the PDF file locally."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "arxiv_id": {
                    "type": "string",
                    "description": "arXiv paper ID (e.g., '2510.26784', '2301.00001v1', or 'math.GT/0309136v1')",
                    "examples": ["2510.26784", "2301.00001v1", "math.GT/0309136v1"]
                },
                "save_path": {
                    "type": "string",
                    "description": "Optional path to save the PDF file. If not provided, saves to the current directory with the arXiv ID as filename.",
                    "examples": ["papers/quantum_paper.pdf", "/home/user/downloads/paper.pdf"]
                }
            },
            "required": ["arxiv_id"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params: DownloadPaperInput = parse_input(input, "arxiv_id")?;
        let arxiv_id = checked_id(&params.arxiv_id)?;
        let save_path = pdf_save_path(&arxiv_id, params.save_path.as_deref());

        let pdf = ctx
            .client
            .fetch_pdf(&arxiv_id)
            .await
            .map_err(|e| missing_paper(e, format!("Paper '{arxiv_id}' not found on arXiv")))?;

        save_bytes(&save_path, &pdf).await?;

        let size_mb = pdf.len() as f64 / BYTES_PER_MB;
        let absolute = std::path::absolute(&save_path)?;
        tracing::info!(
            arxiv_id = %arxiv_id,
            bytes = pdf.len(),
            path = %absolute.display(),
            "Downloaded paper"
        );

        Ok(format!(
            "Successfully downloaded paper '{arxiv_id}' ({size_mb:.2} MB) to: {}",
            absolute.display()
        ))
    }
}

/// HTML reader tool.
pub struct ReadOnlineTool;

#[async_trait::async_trait]
impl McpTool for ReadOnlineTool {
    fn name(&self) -> &'static str {
        "read_online"
    }

    fn title(&self) -> &'static str {
        "Read arXiv Paper Online"
    }

    fn description(&self) -> &'static str {
        "Fetch and read the HTML version of an arXiv paper online. \
         Returns the paper content for analysis."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "arxiv_id": {
                    "type": "string",
                    "description": "arXiv paper ID (e.g., '2510.04618', '2301.00001v1', or 'math.GT/0309136v1')",
                    "examples": ["2510.04618", "2301.00001v1", "math.GT/0309136v1"]
                }
            },
            "required": ["arxiv_id"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params: ReadOnlineInput = parse_input(input, "arxiv_id")?;
        let arxiv_id = checked_id(&params.arxiv_id)?;

        let html = ctx.client.fetch_html(&arxiv_id).await.map_err(|e| {
            missing_paper(e, format!("Paper '{arxiv_id}' HTML version not found on arXiv"))
        })?;

        let length = html.chars().count();
        tracing::info!(arxiv_id = %arxiv_id, characters = length, "Fetched paper HTML");

        Ok(format!(
            "Successfully fetched arXiv paper '{arxiv_id}' from HTML version.\n\n\
             Content length: {} characters\n\n\
             HTML URL: {}\n\n---\n\n{html}",
            group_thousands(length),
            ctx.client.html_url(&arxiv_id)
        ))
    }
}

fn checked_id(raw: &str) -> ToolResult<String> {
    validate_arxiv_id(raw).map_err(|e| {
        tracing::error!(error = %e, "Invalid arXiv ID");
        ToolError::validation("arxiv_id", e.to_string())
    })
}

/// `1234567` as `1,234,567`.
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Turn a 404 into a readable message; pass other failures through.
fn missing_paper(err: ClientError, message: String) -> ToolError {
    match err {
        ClientError::NotFound { .. } => ToolError::unavailable(message),
        other => other.into(),
    }
}

/// Where a PDF should be written.
///
/// Without an explicit path the identifier becomes the file name, with `/`
/// replaced so legacy identifiers do not create directories.
fn pdf_save_path(arxiv_id: &str, requested: Option<&str>) -> PathBuf {
    match requested.map(str::trim).filter(|p| !p.is_empty()) {
        Some(path) if path.ends_with(".pdf") => PathBuf::from(path),
        Some(path) => PathBuf::from(format!("{path}.pdf")),
        None => PathBuf::from(format!("{}.pdf", arxiv_id.replace('/', "_"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_save_path_flattens_legacy_ids() {
        assert_eq!(pdf_save_path("math.GT/0309136v1", None), PathBuf::from("math.GT_0309136v1.pdf"));
        assert_eq!(pdf_save_path("2510.26784", None), PathBuf::from("2510.26784.pdf"));
        assert_eq!(pdf_save_path("2510.26784", Some("  ")), PathBuf::from("2510.26784.pdf"));
    }

    #[test]
    fn test_requested_save_path_gets_extension() {
        assert_eq!(pdf_save_path("2510.26784", Some("papers/q")), PathBuf::from("papers/q.pdf"));
        assert_eq!(
            pdf_save_path("2510.26784", Some("papers/q.pdf")),
            PathBuf::from("papers/q.pdf")
        );
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_missing_paper_only_rewrites_not_found() {
        let err = missing_paper(ClientError::not_found("http://x/pdf/1.pdf"), "gone".to_string());
        assert!(matches!(err, ToolError::Unavailable(ref m) if m == "gone"));

        let err = missing_paper(ClientError::server(503, "busy"), "gone".to_string());
        assert!(matches!(err, ToolError::Client(ClientError::Server { status: 503, .. })));
    }
}
