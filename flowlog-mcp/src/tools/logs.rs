//! Log tools
//!
//! One tool per backend log endpoint. Argument names are snake_case here and
//! translated to the backend's camelCase query names by the query DTOs.

use async_trait::async_trait;
use flowlog_client::LogsClient;
use flowlog_core::domain::log::LogLevel;
use flowlog_core::dto::log::{
    DEFAULT_SEARCH_PAGE, DEFAULT_SEARCH_SIZE, ExecutionLogsQuery, FlowLogsQuery,
    FollowLogsQuery, SearchLogsQuery,
};
use serde_json::{Value, json};

use super::{Arguments, Tool, ToolError, ToolOutput};

fn min_level_schema(purpose: &str) -> Value {
    json!({
        "type": "string",
        "enum": LogLevel::ALL.iter().map(LogLevel::as_str).collect::<Vec<_>>(),
        "description": format!(
            "Minimum log level {}. Must be one of: ERROR, WARN, INFO, DEBUG, TRACE.",
            purpose
        )
    })
}

/// Schema shared by the per-execution tools
fn execution_logs_schema(execution_id: &str, scope: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "execution_id": {
                "type": "string",
                "description": execution_id
            },
            "min_level": min_level_schema(&format!("to {}", scope)),
            "task_run_id": {
                "type": "string",
                "description": format!("Only {} logs of this task run.", scope)
            },
            "task_id": {
                "type": "string",
                "description": format!("Only {} logs of this task.", scope)
            },
            "attempt": {
                "type": "integer",
                "description": format!("Only {} logs of this attempt number.", scope)
            }
        },
        "required": ["execution_id"]
    })
}

/// Filters shared by the per-execution tools
fn execution_logs_query(args: &Arguments) -> Result<ExecutionLogsQuery, ToolError> {
    Ok(ExecutionLogsQuery {
        min_level: args.min_level()?,
        task_run_id: args.optional_str("task_run_id")?,
        task_id: args.optional_str("task_id")?,
        attempt: args.optional_i64("attempt")?,
    })
}

pub struct GetExecutionLogsTool;

#[async_trait]
impl Tool for GetExecutionLogsTool {
    fn name(&self) -> &'static str {
        "get_execution_logs"
    }

    fn description(&self) -> &'static str {
        "Get the log entries of one execution, optionally filtered by minimum level, \
         task run, task or attempt. Each entry carries namespace, flowId, taskId, \
         executionId, taskRunId, attemptNumber, triggerId, timestamp, level, thread, \
         message, deleted and executionKind."
    }

    fn schema(&self) -> Value {
        execution_logs_schema("The execution ID to get logs for.", "return")
    }

    async fn call(&self, client: &LogsClient, args: Arguments) -> Result<ToolOutput, ToolError> {
        let execution_id = args.required_str("execution_id")?;
        let query = execution_logs_query(&args)?;

        let logs = client.get_execution_logs(&execution_id, &query).await?;
        Ok(ToolOutput::Json(logs))
    }
}

pub struct DownloadExecutionLogsTool;

#[async_trait]
impl Tool for DownloadExecutionLogsTool {
    fn name(&self) -> &'static str {
        "download_execution_logs"
    }

    fn description(&self) -> &'static str {
        "Download the logs of one execution as plain text, ready to save to a file \
         or process as text."
    }

    fn schema(&self) -> Value {
        execution_logs_schema("The execution ID to download logs for.", "download")
    }

    async fn call(&self, client: &LogsClient, args: Arguments) -> Result<ToolOutput, ToolError> {
        let execution_id = args.required_str("execution_id")?;
        let query = execution_logs_query(&args)?;

        let text = client.download_execution_logs(&execution_id, &query).await?;
        Ok(ToolOutput::Text(text))
    }
}

pub struct SearchLogsTool;

#[async_trait]
impl Tool for SearchLogsTool {
    fn name(&self) -> &'static str {
        "search_logs"
    }

    fn description(&self) -> &'static str {
        "Search logs across all executions by text, namespace, flow, minimum level \
         and date range. Returns a page of results with the total match count."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Text to look for in log messages."
                },
                "namespace": {
                    "type": "string",
                    "description": "Only search logs of this namespace."
                },
                "flow_id": {
                    "type": "string",
                    "description": "Only search logs of this flow."
                },
                "min_level": min_level_schema("to return"),
                "start_date": {
                    "type": "string",
                    "description": "Start of the search window, ISO 8601 (e.g. '2024-01-01T00:00:00Z')."
                },
                "end_date": {
                    "type": "string",
                    "description": "End of the search window, ISO 8601 (e.g. '2024-01-31T23:59:59Z')."
                },
                "page": {
                    "type": "integer",
                    "default": DEFAULT_SEARCH_PAGE,
                    "description": "Page number."
                },
                "size": {
                    "type": "integer",
                    "default": DEFAULT_SEARCH_SIZE,
                    "description": "Results per page."
                }
            },
            "required": []
        })
    }

    async fn call(&self, client: &LogsClient, args: Arguments) -> Result<ToolOutput, ToolError> {
        let query = SearchLogsQuery {
            q: args.optional_str("query")?,
            namespace: args.optional_str("namespace")?,
            flow_id: args.optional_str("flow_id")?,
            min_level: args.min_level()?,
            start_date: args.optional_str("start_date")?,
            end_date: args.optional_str("end_date")?,
            page: args.i64_or("page", DEFAULT_SEARCH_PAGE)?,
            size: args.i64_or("size", DEFAULT_SEARCH_SIZE)?,
        };

        let result = client.search_logs(&query).await?;
        Ok(ToolOutput::Json(result))
    }
}

pub struct DeleteExecutionLogsTool;

#[async_trait]
impl Tool for DeleteExecutionLogsTool {
    fn name(&self) -> &'static str {
        "delete_execution_logs"
    }

    fn description(&self) -> &'static str {
        "Delete the logs of one execution, optionally only those matching a minimum \
         level, task run, task or attempt. Deleted logs cannot be recovered."
    }

    fn schema(&self) -> Value {
        execution_logs_schema("The execution ID to delete logs for.", "delete")
    }

    fn destructive(&self) -> bool {
        true
    }

    async fn call(&self, client: &LogsClient, args: Arguments) -> Result<ToolOutput, ToolError> {
        let execution_id = args.required_str("execution_id")?;
        let query = execution_logs_query(&args)?;

        let confirmation = client.delete_execution_logs(&execution_id, &query).await?;
        Ok(ToolOutput::Json(confirmation))
    }
}

pub struct DeleteFlowLogsTool;

#[async_trait]
impl Tool for DeleteFlowLogsTool {
    fn name(&self) -> &'static str {
        "delete_flow_logs"
    }

    fn description(&self) -> &'static str {
        "Delete the logs of every execution of a flow, optionally only those of one \
         trigger. Deleted logs cannot be recovered."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "namespace": {
                    "type": "string",
                    "description": "The namespace of the flow."
                },
                "flow_id": {
                    "type": "string",
                    "description": "The flow ID to delete logs for."
                },
                "trigger_id": {
                    "type": "string",
                    "description": "Only delete logs of this trigger."
                }
            },
            "required": ["namespace", "flow_id"]
        })
    }

    fn destructive(&self) -> bool {
        true
    }

    async fn call(&self, client: &LogsClient, args: Arguments) -> Result<ToolOutput, ToolError> {
        let namespace = args.required_str("namespace")?;
        let flow_id = args.required_str("flow_id")?;
        let query = FlowLogsQuery {
            trigger_id: args.optional_str("trigger_id")?,
        };

        let confirmation = client.delete_flow_logs(&namespace, &flow_id, &query).await?;
        Ok(ToolOutput::Json(confirmation))
    }
}

pub struct FollowExecutionLogsTool;

#[async_trait]
impl Tool for FollowExecutionLogsTool {
    fn name(&self) -> &'static str {
        "follow_execution_logs"
    }

    fn description(&self) -> &'static str {
        "Follow the logs of a running execution. The backend streams server-sent \
         events; this tool returns the text of a single response, not a live feed."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "execution_id": {
                    "type": "string",
                    "description": "The execution ID to follow logs for."
                },
                "min_level": min_level_schema("to return")
            },
            "required": ["execution_id"]
        })
    }

    async fn call(&self, client: &LogsClient, args: Arguments) -> Result<ToolOutput, ToolError> {
        let execution_id = args.required_str("execution_id")?;
        let query = FollowLogsQuery {
            min_level: args.min_level()?,
        };

        let text = client.follow_execution_logs(&execution_id, &query).await?;
        Ok(ToolOutput::Text(text))
    }
}
