//! Image tool: get_image.

use std::path::PathBuf;

use md5::{Digest, Md5};
use serde_json::json;
use url::Url;

use super::{McpTool, ToolContext, parse_input, save_bytes};
use crate::error::{ToolError, ToolResult};
use crate::models::{GetImageInput, ImageFormat};

/// Downloads a figure so the agent can open it from disk.
pub struct GetImageTool;

#[async_trait::async_trait]
impl McpTool for GetImageTool {
    fn name(&self) -> &'static str {
        "get_image"
    }

    fn title(&self) -> &'static str {
        "Get Image from URL"
    }

    fn description(&self) -> &'static str {
        "Download an image from URL and return the local file path."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "image_url": {
                    "type": "string",
                    "description": "Direct URL to an image file (PNG, JPEG, GIF, WebP)",
                    "examples": [
                        "https://arxiv.org/html/2510.04618/x1.png",
                        "https://example.com/chart.png"
                    ]
                }
            },
            "required": ["image_url"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params: GetImageInput = parse_input(input, "image_url")?;

        let url = Url::parse(params.image_url.trim())
            .map_err(|e| ToolError::validation("image_url", format!("not a valid URL: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ToolError::validation(
                "image_url",
                format!("unsupported scheme '{}', expected http or https", url.scheme()),
            ));
        }

        let image = ctx.client.fetch_image(url.as_str()).await?;
        let format = ImageFormat::detect(image.content_type.as_deref(), url.path());
        let path = ctx.config.image_dir.join(image_file_name(&params.image_url, format));

        save_bytes(&path, &image.bytes).await?;

        let absolute = std::path::absolute(&path)?;
        tracing::info!(
            bytes = image.bytes.len(),
            path = %absolute.display(),
            "Downloaded image"
        );

        Ok(absolute.display().to_string())
    }
}

/// `image_<first 8 hex digits of md5(url)>.<ext>`, stable per URL.
fn image_file_name(url: &str, format: ImageFormat) -> PathBuf {
    let digest = format!("{:x}", Md5::digest(url.as_bytes()));
    PathBuf::from(format!("image_{}.{}", &digest[..8], format.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_file_name_is_stable() {
        let a = image_file_name("https://arxiv.org/html/2510.04618/x1.png", ImageFormat::Png);
        let b = image_file_name("https://arxiv.org/html/2510.04618/x1.png", ImageFormat::Png);
        assert_eq!(a, b);

        let name = a.to_string_lossy().into_owned();
        assert!(name.starts_with("image_"));
        assert!(name.ends_with(".png"));
        assert_eq!(name.len(), "image_".len() + 8 + ".png".len());
    }

    #[test]
    fn test_md5_prefix_matches_known_digest() {
        // md5("") = d41d8cd98f00b204e9800998ecf8427e
        assert_eq!(image_file_name("", ImageFormat::Gif), PathBuf::from("image_d41d8cd9.gif"));
    }
}
