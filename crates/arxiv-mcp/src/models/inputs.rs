//! Input models for MCP tool parameters.
//!
//! Argument names are snake_case, as agents already send them.

use serde::{Deserialize, Serialize};

/// Input for `send_query`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendQueryInput {
    /// Raw API query string (e.g., "search_query=ti:quantum&max_results=5").
    pub query: String,
}

/// Input for `download_paper`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadPaperInput {
    /// arXiv identifier (e.g., "2510.26784" or "math.GT/0309136v1").
    pub arxiv_id: String,

    /// Where to write the PDF. Defaults to `<id>.pdf` in the working directory.
    #[serde(default)]
    pub save_path: Option<String>,
}

/// Input for `read_online`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadOnlineInput {
    /// arXiv identifier.
    pub arxiv_id: String,
}

/// Input for `get_image`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetImageInput {
    /// Direct URL to an image file.
    pub image_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_paper_save_path_optional() {
        let input: DownloadPaperInput =
            serde_json::from_value(serde_json::json!({"arxiv_id": "2301.00001"})).unwrap();
        assert_eq!(input.arxiv_id, "2301.00001");
        assert!(input.save_path.is_none());
    }

    #[test]
    fn test_send_query_requires_query() {
        let result = serde_json::from_value::<SendQueryInput>(serde_json::json!({}));
        assert!(result.is_err());
    }
}
