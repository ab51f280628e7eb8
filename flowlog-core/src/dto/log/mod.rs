//! Log DTOs for the backend log API

use serde::{Deserialize, Serialize};

use crate::domain::log::LogLevel;

/// Default page requested by a log search
pub const DEFAULT_SEARCH_PAGE: i64 = 1;

/// Default page size requested by a log search
pub const DEFAULT_SEARCH_SIZE: i64 = 25;

/// Treats an empty string the same as an absent one.
fn is_absent(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

/// Filters shared by the per-execution endpoints
/// (`GET /logs/{id}`, `GET /logs/{id}/download`, `DELETE /logs/{id}`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionLogsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_level: Option<LogLevel>,
    #[serde(skip_serializing_if = "is_absent")]
    pub task_run_id: Option<String>,
    #[serde(skip_serializing_if = "is_absent")]
    pub task_id: Option<String>,
    /// Attempt 0 is a real attempt and is always sent when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt: Option<i64>,
}

/// Query for `GET /logs/search`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchLogsQuery {
    #[serde(skip_serializing_if = "is_absent")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "is_absent")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "is_absent")]
    pub flow_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_level: Option<LogLevel>,
    /// ISO-8601 timestamp, passed through unparsed
    #[serde(skip_serializing_if = "is_absent")]
    pub start_date: Option<String>,
    /// ISO-8601 timestamp, passed through unparsed
    #[serde(skip_serializing_if = "is_absent")]
    pub end_date: Option<String>,
    pub page: i64,
    pub size: i64,
}

impl Default for SearchLogsQuery {
    fn default() -> Self {
        Self {
            q: None,
            namespace: None,
            flow_id: None,
            min_level: None,
            start_date: None,
            end_date: None,
            page: DEFAULT_SEARCH_PAGE,
            size: DEFAULT_SEARCH_SIZE,
        }
    }
}

/// Query for `DELETE /logs/{namespace}/{flowId}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowLogsQuery {
    #[serde(skip_serializing_if = "is_absent")]
    pub trigger_id: Option<String>,
}

/// Query for `GET /logs/{id}/follow`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowLogsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_level: Option<LogLevel>,
}

/// Confirmation returned for a delete the backend answered with an empty body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    pub status: String,
}

impl DeleteConfirmation {
    pub fn deleted() -> Self {
        Self {
            status: "deleted".to_string(),
        }
    }
}

impl From<DeleteConfirmation> for serde_json::Value {
    fn from(confirmation: DeleteConfirmation) -> Self {
        serde_json::json!({ "status": confirmation.status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_execution_query_omits_absent_fields() {
        let query = ExecutionLogsQuery::default();
        assert_eq!(serde_json::to_value(&query).unwrap(), json!({}));
    }

    #[test]
    fn test_execution_query_uses_wire_names() {
        let query = ExecutionLogsQuery {
            min_level: Some(LogLevel::Info),
            task_run_id: Some("tr-1".to_string()),
            task_id: Some("hello".to_string()),
            attempt: Some(2),
        };
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({ "minLevel": "INFO", "taskRunId": "tr-1", "taskId": "hello", "attempt": 2 })
        );
    }

    #[test]
    fn test_execution_query_keeps_attempt_zero() {
        let query = ExecutionLogsQuery {
            attempt: Some(0),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&query).unwrap(), json!({ "attempt": 0 }));
    }

    #[test]
    fn test_empty_strings_are_omitted() {
        let query = ExecutionLogsQuery {
            task_run_id: Some(String::new()),
            task_id: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&query).unwrap(), json!({}));
    }

    #[test]
    fn test_search_query_always_paginates() {
        let query = SearchLogsQuery::default();
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({ "page": 1, "size": 25 })
        );
    }

    #[test]
    fn test_search_query_full() {
        let query = SearchLogsQuery {
            q: Some("timeout".to_string()),
            namespace: Some("company.team".to_string()),
            flow_id: Some("etl".to_string()),
            min_level: Some(LogLevel::Warn),
            start_date: Some("2024-01-01T00:00:00Z".to_string()),
            end_date: Some("2024-01-31T23:59:59Z".to_string()),
            page: 3,
            size: 10,
        };
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({
                "q": "timeout",
                "namespace": "company.team",
                "flowId": "etl",
                "minLevel": "WARN",
                "startDate": "2024-01-01T00:00:00Z",
                "endDate": "2024-01-31T23:59:59Z",
                "page": 3,
                "size": 10
            })
        );
    }

    #[test]
    fn test_flow_query_trigger() {
        assert_eq!(serde_json::to_value(FlowLogsQuery::default()).unwrap(), json!({}));
        let query = FlowLogsQuery {
            trigger_id: Some("schedule".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({ "triggerId": "schedule" })
        );
    }

    #[test]
    fn test_delete_confirmation_value() {
        let value: serde_json::Value = DeleteConfirmation::deleted().into();
        assert_eq!(value, json!({ "status": "deleted" }));
    }
}
