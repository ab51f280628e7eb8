//! JSON-RPC method dispatch
//!
//! Routes MCP requests to the tool registry. Tool failures are reported as
//! tool results with `isError: true`; only malformed calls become JSON-RPC
//! errors.

use flowlog_client::LogsClient;
use serde_json::{Value, json};

use crate::protocol::{INVALID_PARAMS, METHOD_NOT_FOUND, Request, Response};
use crate::tools::{Arguments, ToolError, ToolOutput, ToolRegistry};

/// Protocol version answered when the client does not name one
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

/// MCP server state, shared read-only across requests
pub struct Server {
    registry: ToolRegistry,
    client: LogsClient,
}

impl Server {
    pub fn new(registry: ToolRegistry, client: LogsClient) -> Self {
        Self { registry, client }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Handle one request
    ///
    /// Notifications (requests without an `id` member) are accepted silently.
    /// An explicit `"id": null` is still answered.
    pub async fn handle_request(&self, request: Request) -> Option<Response> {
        let Some(id) = request.id else {
            tracing::debug!("Notification: {}", request.method);
            return None;
        };

        let response = match request.method.as_str() {
            "initialize" => Response::ok(id, initialize_result(request.params.as_ref())),
            "ping" => Response::ok(id, json!({})),
            "tools/list" => Response::ok(
                id,
                json!({
                    "tools": self.registry.definitions(),
                    "nextCursor": null
                }),
            ),
            "tools/call" => self.handle_tools_call(id, request.params).await,
            other => {
                tracing::debug!("Unknown method: {}", other);
                Response::error(id, METHOD_NOT_FOUND, "Method not found")
            }
        };

        Some(response)
    }

    async fn handle_tools_call(&self, id: Value, params: Option<Value>) -> Response {
        let params = match params {
            Some(Value::Object(map)) => map,
            Some(_) => return Response::error(id, INVALID_PARAMS, "params must be an object"),
            None => return Response::error(id, INVALID_PARAMS, "Missing params"),
        };
        let name = match params.get("name").and_then(Value::as_str) {
            Some(value) => value,
            None => return Response::error(id, INVALID_PARAMS, "Missing tool name"),
        };
        let Some(tool) = self.registry.get(name) else {
            return Response::error(id, METHOD_NOT_FOUND, format!("Unknown tool: {}", name));
        };

        let args = match params.get("arguments") {
            None | Some(Value::Null) => Arguments::default(),
            Some(Value::Object(map)) => Arguments::new(map.clone()),
            Some(_) => return Response::error(id, INVALID_PARAMS, "arguments must be an object"),
        };

        tracing::info!("Calling tool: {}", name);

        match tool.call(&self.client, args).await {
            Ok(output) => tool_result(id, output),
            Err(ToolError::InvalidParams(message)) => {
                tracing::warn!("Invalid arguments for {}: {}", name, message);
                Response::error(id, INVALID_PARAMS, message)
            }
            Err(ToolError::Client(err)) => {
                tracing::warn!("Tool {} failed: {}", name, err);
                tool_error(id, format!("Error executing tool {}: {}", name, err))
            }
        }
    }
}

fn initialize_result(params: Option<&Value>) -> Value {
    let protocol_version = params
        .and_then(|p| p.get("protocolVersion"))
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_PROTOCOL_VERSION);

    json!({
        "protocolVersion": protocol_version,
        "capabilities": { "tools": { "listChanged": false } },
        "serverInfo": { "name": "flowlog-mcp", "version": env!("CARGO_PKG_VERSION") }
    })
}

fn tool_result(id: Value, output: ToolOutput) -> Response {
    let text = match output {
        ToolOutput::Text(text) => text,
        ToolOutput::Json(value) => {
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
        }
    };

    Response::ok(
        id,
        json!({
            "content": [{ "type": "text", "text": text }],
            "isError": false
        }),
    )
}

fn tool_error(id: Value, message: String) -> Response {
    Response::ok(
        id,
        json!({
            "content": [{ "type": "text", "text": message }],
            "isError": true
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> Server {
        let client = LogsClient::new("http://127.0.0.1:9").unwrap();
        Server::new(ToolRegistry::with_log_tools(), client)
    }

    fn request(id: Option<Value>, method: &str, params: Option<Value>) -> Request {
        Request {
            jsonrpc: Some("2.0".to_string()),
            id,
            method: method.to_string(),
            params,
        }
    }

    fn to_value(response: Response) -> Value {
        serde_json::to_value(response).unwrap()
    }

    #[tokio::test]
    async fn test_initialize_echoes_protocol_version() {
        let res = server()
            .handle_request(request(
                Some(json!(1)),
                "initialize",
                Some(json!({ "protocolVersion": "2025-03-26" })),
            ))
            .await
            .unwrap();
        let value = to_value(res);
        assert_eq!(value["result"]["protocolVersion"], "2025-03-26");
        assert_eq!(value["result"]["serverInfo"]["name"], "flowlog-mcp");
    }

    #[tokio::test]
    async fn test_initialize_default_protocol_version() {
        let res = server()
            .handle_request(request(Some(json!(1)), "initialize", None))
            .await
            .unwrap();
        assert_eq!(to_value(res)["result"]["protocolVersion"], DEFAULT_PROTOCOL_VERSION);
    }

    #[tokio::test]
    async fn test_notification_has_no_response() {
        let res = server()
            .handle_request(request(None, "notifications/initialized", None))
            .await;
        assert!(res.is_none());
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let res = server()
            .handle_request(request(Some(json!(3)), "resources/list", None))
            .await
            .unwrap();
        assert_eq!(to_value(res)["error"]["code"], METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_ping() {
        let res = server()
            .handle_request(request(Some(json!(4)), "ping", None))
            .await
            .unwrap();
        assert_eq!(to_value(res)["result"], json!({}));
    }

    #[tokio::test]
    async fn test_tools_call_requires_params() {
        let res = server()
            .handle_request(request(Some(json!(5)), "tools/call", None))
            .await
            .unwrap();
        assert_eq!(to_value(res)["error"]["code"], INVALID_PARAMS);

        let res = server()
            .handle_request(request(Some(json!(6)), "tools/call", Some(json!({}))))
            .await
            .unwrap();
        assert_eq!(to_value(res)["error"]["message"], "Missing tool name");
    }

    #[tokio::test]
    async fn test_tools_call_unknown_tool() {
        let res = server()
            .handle_request(request(
                Some(json!(7)),
                "tools/call",
                Some(json!({ "name": "execute_flow", "arguments": {} })),
            ))
            .await
            .unwrap();
        let value = to_value(res);
        assert_eq!(value["error"]["code"], METHOD_NOT_FOUND);
        assert_eq!(value["error"]["message"], "Unknown tool: execute_flow");
    }

    #[tokio::test]
    async fn test_tools_call_rejects_non_object_arguments() {
        let res = server()
            .handle_request(request(
                Some(json!(8)),
                "tools/call",
                Some(json!({ "name": "search_logs", "arguments": [1, 2] })),
            ))
            .await
            .unwrap();
        assert_eq!(to_value(res)["error"]["code"], INVALID_PARAMS);
    }

    #[test]
    fn test_tool_result_text_is_verbatim() {
        let value = to_value(tool_result(json!(1), ToolOutput::Text("a\nb".to_string())));
        assert_eq!(value["result"]["content"][0]["text"], "a\nb");
        assert_eq!(value["result"]["isError"], false);
    }

    #[test]
    fn test_tool_result_json_round_trips() {
        let body = json!([{ "level": "INFO", "message": "hi" }]);
        let value = to_value(tool_result(json!(1), ToolOutput::Json(body.clone())));
        let text = value["result"]["content"][0]["text"].as_str().unwrap();
        assert_eq!(serde_json::from_str::<Value>(text).unwrap(), body);
    }
}
