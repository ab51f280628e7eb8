//! Tool registry
//!
//! Maps tool names to handlers. The registry is built once at start-up and
//! shared read-only with every request.

mod args;
mod logs;

pub use args::Arguments;
pub use logs::{
    DeleteExecutionLogsTool, DeleteFlowLogsTool, DownloadExecutionLogsTool,
    FollowExecutionLogsTool, GetExecutionLogsTool, SearchLogsTool,
};

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use flowlog_client::{ClientError, LogsClient};
use serde_json::{Value, json};
use thiserror::Error;

/// Errors a tool call can end with
#[derive(Debug, Error)]
pub enum ToolError {
    /// Arguments do not match the tool schema
    #[error("{0}")]
    InvalidParams(String),

    /// The operation itself failed
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// What a tool hands back to the caller
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// Decoded JSON body
    Json(Value),
    /// Raw text body
    Text(String),
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// JSON schema of the tool arguments
    fn schema(&self) -> Value;

    /// Whether the tool removes data on the backend
    fn destructive(&self) -> bool {
        false
    }

    async fn call(&self, client: &LogsClient, args: Arguments) -> Result<ToolOutput, ToolError>;
}

pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Registry holding every log tool
    pub fn with_log_tools() -> Self {
        let mut registry = Self::new();
        registry
            .register(Arc::new(GetExecutionLogsTool))
            .register(Arc::new(DownloadExecutionLogsTool))
            .register(Arc::new(SearchLogsTool))
            .register(Arc::new(DeleteExecutionLogsTool))
            .register(Arc::new(DeleteFlowLogsTool))
            .register(Arc::new(FollowExecutionLogsTool));
        registry
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) -> &mut Self {
        tracing::debug!("Registering tool: {}", tool.name());
        self.tools.insert(tool.name().to_string(), tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Tool names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Tool definitions as listed by `tools/list`, sorted by name
    pub fn definitions(&self) -> Vec<Value> {
        self.names()
            .into_iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| {
                json!({
                    "name": tool.name(),
                    "description": tool.description(),
                    "inputSchema": tool.schema(),
                    "annotations": {
                        "readOnlyHint": !tool.destructive(),
                        "destructiveHint": tool.destructive()
                    }
                })
            })
            .collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_tools_registered() {
        let registry = ToolRegistry::with_log_tools();
        assert_eq!(registry.len(), 6);
        assert_eq!(
            registry.names(),
            vec![
                "delete_execution_logs",
                "delete_flow_logs",
                "download_execution_logs",
                "follow_execution_logs",
                "get_execution_logs",
                "search_logs",
            ]
        );
    }

    #[test]
    fn test_registry_get() {
        let registry = ToolRegistry::with_log_tools();
        assert!(registry.get("search_logs").is_some());
        assert!(registry.get("execute_flow").is_none());
        assert!(ToolRegistry::new().is_empty());
    }

    #[test]
    fn test_definitions_mark_destructive_tools() {
        let registry = ToolRegistry::with_log_tools();
        let definitions = registry.definitions();

        for definition in &definitions {
            let name = definition["name"].as_str().unwrap();
            let destructive = name.starts_with("delete_");
            assert_eq!(definition["annotations"]["destructiveHint"], destructive, "{name}");
            assert_eq!(definition["inputSchema"]["type"], "object", "{name}");
        }
    }

    #[test]
    fn test_definitions_required_fields() {
        let registry = ToolRegistry::with_log_tools();
        let definitions = registry.definitions();
        let delete_flow = definitions
            .iter()
            .find(|d| d["name"] == "delete_flow_logs")
            .unwrap();
        assert_eq!(
            delete_flow["inputSchema"]["required"],
            json!(["namespace", "flow_id"])
        );

        let search = definitions.iter().find(|d| d["name"] == "search_logs").unwrap();
        assert_eq!(search["inputSchema"]["required"], json!([]));
        assert_eq!(search["inputSchema"]["properties"]["size"]["default"], 25);
    }
}
