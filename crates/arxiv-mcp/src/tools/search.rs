//! Search tool: send_query.

use serde_json::json;

use super::{McpTool, ToolContext, parse_input};
use crate::error::{ToolError, ToolResult};
use crate::models::SendQueryInput;
use crate::validation;

/// Validated passthrough to the arXiv query API.
pub struct SendQueryTool;

#[async_trait::async_trait]
impl McpTool for SendQueryTool {
    fn name(&self) -> &'static str {
        "send_query"
    }

    fn title(&self) -> &'static str {
        "Search arXiv Papers"
    }

    fn description(&self) -> &'static str {
        "Search for academic papers on arXiv using query parameters. Supports field-specific \
         searches (ti:, au:, abs:, etc.) and Boolean operators (AND, OR, ANDNOT). \
         Parameters are validated before the request is sent; the response is the raw Atom feed."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "arXiv API query parameters (e.g., 'search_query=au:einstein&max_results=10' or 'id_list=1234.5678'). See the docs://api resource for full syntax.",
                    "examples": [
                        "search_query=ti:quantum&max_results=5",
                        "search_query=au:del_maestro+AND+ti:checkerboard",
                        "search_query=ti:%22quantum+criticality%22&sortBy=lastUpdatedDate&sortOrder=descending",
                        "search_query=cat:cond-mat.mes-hall+AND+abs:graphene&max_results=20",
                        "id_list=cond-mat/0207270v1,2301.00001",
                        "search_query=all:electron&start=10&max_results=50"
                    ]
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params: SendQueryInput = parse_input(input, "query")?;

        let validated = validation::validate_query(&params.query).map_err(|e| {
            tracing::error!(field = e.field(), error = %e, "Parameter validation error");
            ToolError::from(e)
        })?;
        tracing::info!(params = ?validated.names(), "Parameters validated successfully");

        // The request carries the caller's string, not a re-encoding of `validated`.
        Ok(ctx.client.query(&params.query).await?)
    }
}
