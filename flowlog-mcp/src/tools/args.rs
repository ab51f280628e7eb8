//! Typed access to tool-call arguments

use flowlog_client::ClientError;
use flowlog_core::domain::log::LogLevel;
use serde_json::{Map, Value};

use super::ToolError;

/// Arguments of one tool call
///
/// A JSON `null` is treated the same as a missing argument.
#[derive(Debug, Clone, Default)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    pub fn new(values: Map<String, Value>) -> Self {
        Self(values)
    }

    fn present(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|value| !value.is_null())
    }

    pub fn required_str(&self, name: &str) -> Result<String, ToolError> {
        self.optional_str(name)?
            .ok_or_else(|| ToolError::InvalidParams(format!("Missing required argument: {}", name)))
    }

    pub fn optional_str(&self, name: &str) -> Result<Option<String>, ToolError> {
        match self.present(name) {
            None => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.clone())),
            Some(_) => Err(ToolError::InvalidParams(format!("{} must be a string", name))),
        }
    }

    pub fn optional_i64(&self, name: &str) -> Result<Option<i64>, ToolError> {
        match self.present(name) {
            None => Ok(None),
            Some(value) => value
                .as_i64()
                .map(Some)
                .ok_or_else(|| ToolError::InvalidParams(format!("{} must be an integer", name))),
        }
    }

    /// An integer argument, falling back to `default` when absent
    ///
    /// The range is left to the backend.
    pub fn i64_or(&self, name: &str, default: i64) -> Result<i64, ToolError> {
        Ok(self.optional_i64(name)?.unwrap_or(default))
    }

    /// The `min_level` filter, checked against the known levels
    pub fn min_level(&self) -> Result<Option<LogLevel>, ToolError> {
        let raw = self.optional_str("min_level")?;
        let level = LogLevel::parse_filter(raw.as_deref()).map_err(ClientError::from)?;

        Ok(level)
    }
}
