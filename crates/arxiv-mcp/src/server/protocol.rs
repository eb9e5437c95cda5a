//! JSON-RPC 2.0 message types and the MCP method dispatcher.
//!
//! Both transports feed parsed requests through [`Dispatcher::handle`], so the
//! stdio and HTTP servers answer every method identically.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ToolError;
use crate::resources::{self, DOC_RESOURCES};
use crate::tools::{McpTool, ToolContext};

/// Protocol version reported when the client does not ask for one.
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name reported in `initialize` and `/health`.
pub const SERVER_NAME: &str = "arxiv-mcp";

/// JSON-RPC error codes used by the server.
pub mod codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// JSON-RPC 2.0 request.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    #[serde(default)]
    pub id: Option<serde_json::Value>,
}

impl JsonRpcRequest {
    /// Requests without an id are notifications and get no reply.
    #[must_use]
    pub const fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: Cow<'static, str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcResponse {
    const VERSION: &'static str = "2.0";

    #[must_use]
    pub fn success(id: Option<serde_json::Value>, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: Cow::Borrowed(Self::VERSION),
            result: Some(result),
            error: None,
            id,
        }
    }

    #[must_use]
    pub fn error(id: Option<serde_json::Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: Cow::Borrowed(Self::VERSION),
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
            id,
        }
    }

    /// Reply for a line or body that was not valid JSON-RPC.
    #[must_use]
    pub fn parse_error(err: &serde_json::Error) -> Self {
        Self::error(None, codes::PARSE_ERROR, format!("Parse error: {err}"))
    }
}

/// MCP tool info for tools/list response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct McpToolInfo {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub input_schema: serde_json::Value,
}

impl McpToolInfo {
    fn of(tool: &dyn McpTool) -> Self {
        Self {
            name: tool.name(),
            title: tool.title(),
            description: tool.description(),
            input_schema: tool.input_schema(),
        }
    }
}

/// Routes MCP methods to tools and resources.
pub struct Dispatcher {
    tools: Vec<Box<dyn McpTool>>,
    ctx: ToolContext,
}

impl Dispatcher {
    #[must_use]
    pub fn new(tools: Vec<Box<dyn McpTool>>, ctx: ToolContext) -> Self {
        Self { tools, ctx }
    }

    /// Registered tools, in listing order.
    #[must_use]
    pub fn tools(&self) -> &[Box<dyn McpTool>] {
        &self.tools
    }

    /// Answer one request. Returns `None` for notifications.
    pub async fn handle(&self, req: JsonRpcRequest) -> Option<JsonRpcResponse> {
        tracing::debug!(method = %req.method, id = ?req.id, "Dispatching request");

        if req.is_notification() {
            match req.method.as_str() {
                "notifications/initialized" | "initialized" => {
                    tracing::info!("Client initialized");
                }
                "notifications/cancelled" => tracing::debug!(params = %req.params, "Request cancelled"),
                other => tracing::debug!(method = other, "Ignoring notification"),
            }
            return None;
        }

        if req.jsonrpc != JsonRpcResponse::VERSION {
            return Some(JsonRpcResponse::error(
                req.id,
                codes::INVALID_REQUEST,
                format!("Unsupported jsonrpc version: {:?}", req.jsonrpc),
            ));
        }

        let id = req.id;
        let response = match req.method.as_str() {
            "initialize" => JsonRpcResponse::success(id, initialize_result(&req.params)),
            "initialized" | "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.tools_list(id),
            "tools/call" => self.tools_call(id, &req.params).await,
            "resources/list" => resources_list(id),
            "resources/read" => self.resources_read(id, &req.params).await,
            other => JsonRpcResponse::error(
                id,
                codes::METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            ),
        };
        Some(response)
    }

    fn tools_list(&self, id: Option<serde_json::Value>) -> JsonRpcResponse {
        let tools: Vec<McpToolInfo> = self.tools.iter().map(|t| McpToolInfo::of(t.as_ref())).collect();
        JsonRpcResponse::success(id, json!({ "tools": tools }))
    }

    async fn tools_call(
        &self,
        id: Option<serde_json::Value>,
        params: &serde_json::Value,
    ) -> JsonRpcResponse {
        let Some(tool_name) = params.get("name").and_then(serde_json::Value::as_str) else {
            return JsonRpcResponse::error(id, codes::INVALID_PARAMS, "Missing 'name' parameter");
        };

        let Some(tool) = self.tools.iter().find(|t| t.name() == tool_name) else {
            return JsonRpcResponse::error(
                id,
                codes::INVALID_PARAMS,
                format!("Tool not found: {tool_name}"),
            );
        };

        let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

        tracing::info!(tool = %tool_name, "Executing tool");

        match tool.execute(&self.ctx, arguments).await {
            Ok(text) => JsonRpcResponse::success(id, tool_result(text, false)),
            Err(e @ ToolError::MissingArgument(_)) => {
                tracing::warn!(tool = %tool_name, error = %e, "Tool called without required argument");
                JsonRpcResponse::error(id, codes::INVALID_PARAMS, e.to_string())
            }
            Err(e) => {
                tracing::error!(tool = %tool_name, error = %e, "Tool execution failed");
                JsonRpcResponse::success(id, tool_result(format!("Error: {}", e.to_user_message()), true))
            }
        }
    }

    async fn resources_read(
        &self,
        id: Option<serde_json::Value>,
        params: &serde_json::Value,
    ) -> JsonRpcResponse {
        let Some(uri) = params.get("uri").and_then(serde_json::Value::as_str) else {
            return JsonRpcResponse::error(id, codes::INVALID_PARAMS, "Missing 'uri' parameter");
        };

        if resources::find(uri).is_none() {
            return JsonRpcResponse::error(
                id,
                codes::INVALID_PARAMS,
                format!("Resource not found: {uri}"),
            );
        }

        match resources::read(uri, &self.ctx.config.docs_dir).await {
            Ok((resource, text)) => JsonRpcResponse::success(
                id,
                json!({
                    "contents": [{
                        "uri": resource.uri,
                        "mimeType": resource.mime_type,
                        "text": text
                    }]
                }),
            ),
            Err(e) => JsonRpcResponse::error(id, codes::INTERNAL_ERROR, e.to_user_message()),
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").field("tools", &self.tools.len()).finish()
    }
}

fn initialize_result(params: &serde_json::Value) -> serde_json::Value {
    let protocol_version = params
        .get("protocolVersion")
        .and_then(serde_json::Value::as_str)
        .unwrap_or(DEFAULT_PROTOCOL_VERSION);

    tracing::info!(protocol_version, "MCP initialize");

    json!({
        "protocolVersion": protocol_version,
        "capabilities": {
            "tools": { "listChanged": false },
            "resources": { "listChanged": false, "subscribe": false }
        },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}

fn resources_list(id: Option<serde_json::Value>) -> JsonRpcResponse {
    JsonRpcResponse::success(id, json!({ "resources": DOC_RESOURCES }))
}

fn tool_result(text: String, is_error: bool) -> serde_json::Value {
    json!({
        "content": [{ "type": "text", "text": text }],
        "isError": is_error
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: &str, id: Option<i64>, params: serde_json::Value) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id: id.map(Into::into),
        }
    }

    #[tokio::test]
    async fn test_wrong_jsonrpc_version_is_invalid_request() {
        let config = crate::config::Config::for_testing("http://127.0.0.1:9");
        let client = crate::client::ArxivClient::new(&config).unwrap();
        let ctx = ToolContext::new(std::sync::Arc::new(client), std::sync::Arc::new(config));
        let dispatcher = Dispatcher::new(crate::tools::register_all_tools(), ctx);
        let mut req = request("ping", Some(1), json!({}));
        req.jsonrpc = "1.0".to_string();

        let resp = dispatcher.handle(req).await.unwrap();
        let error = resp.error.unwrap();
        assert_eq!(error.code, codes::INVALID_REQUEST);
        assert!(error.message.contains("1.0"));
        assert_eq!(resp.id, Some(json!(1)));
    }

    #[test]
    fn test_error_response_shape() {
        let resp = JsonRpcResponse::error(Some(json!(7)), codes::METHOD_NOT_FOUND, "nope");
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["id"], 7);
        assert_eq!(value["error"]["code"], -32601);
        assert!(value.get("result").is_none());
    }

    #[test]
    fn test_parse_error_has_null_id() {
        let err = serde_json::from_str::<JsonRpcRequest>("{not json").unwrap_err();
        let value = serde_json::to_value(JsonRpcResponse::parse_error(&err)).unwrap();
        assert_eq!(value["error"]["code"], -32700);
        assert!(value["id"].is_null());
    }

    #[test]
    fn test_initialize_echoes_protocol_version() {
        let result = initialize_result(&json!({"protocolVersion": "2025-03-26"}));
        assert_eq!(result["protocolVersion"], "2025-03-26");
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
        assert!(result["capabilities"]["resources"].is_object());

        let result = initialize_result(&serde_json::Value::Null);
        assert_eq!(result["protocolVersion"], DEFAULT_PROTOCOL_VERSION);
    }

    #[test]
    fn test_notification_detection() {
        assert!(request("notifications/initialized", None, json!({})).is_notification());
        assert!(!request("ping", Some(1), json!({})).is_notification());
    }

    #[test]
    fn test_tool_result_flags_errors() {
        let ok = tool_result("feed".to_string(), false);
        assert_eq!(ok["isError"], false);
        assert_eq!(ok["content"][0]["type"], "text");

        let err = tool_result("Error: bad".to_string(), true);
        assert_eq!(err["isError"], true);
    }
}
