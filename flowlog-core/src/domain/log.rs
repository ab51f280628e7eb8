//! Log domain types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Severity of a log entry, as named on the wire.
///
/// Variants are declared from most to least severe. The backend uses that
/// ordering for its "minimum level" filter; nothing here interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// All levels in severity order
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ];

    /// Wire name of the level (e.g. `"INFO"`)
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }

    /// Valid level names, sorted alphabetically and comma-joined
    pub fn valid_names() -> String {
        let mut names: Vec<&str> = Self::ALL.iter().map(LogLevel::as_str).collect();
        names.sort_unstable();
        names.join(", ")
    }

    /// Parse an optional level filter supplied by a caller
    ///
    /// An absent or empty value means "no filter".
    pub fn parse_filter(value: Option<&str>) -> Result<Option<LogLevel>, InvalidLogLevel> {
        match value {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = InvalidLogLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| InvalidLogLevel(s.to_string()))
    }
}

/// A level name outside the accepted set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid min_level '{0}'. Must be one of: {valid}", valid = LogLevel::valid_names())]
pub struct InvalidLogLevel(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_levels() {
        for level in LogLevel::ALL {
            assert_eq!(level.as_str().parse::<LogLevel>(), Ok(level));
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("info".parse::<LogLevel>().is_err());
        assert!("Warn".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_valid_names_sorted() {
        assert_eq!(LogLevel::valid_names(), "DEBUG, ERROR, INFO, TRACE, WARN");
    }

    #[test]
    fn test_invalid_level_message() {
        let err = "BOGUS".parse::<LogLevel>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid min_level 'BOGUS'. Must be one of: DEBUG, ERROR, INFO, TRACE, WARN"
        );
    }

    #[test]
    fn test_parse_filter_absent_or_empty() {
        assert_eq!(LogLevel::parse_filter(None), Ok(None));
        assert_eq!(LogLevel::parse_filter(Some("")), Ok(None));
        assert_eq!(LogLevel::parse_filter(Some("TRACE")), Ok(Some(LogLevel::Trace)));
        assert!(LogLevel::parse_filter(Some("VERBOSE")).is_err());
    }

    #[test]
    fn test_serde_uses_wire_names() {
        assert_eq!(serde_json::to_string(&LogLevel::Warn).unwrap(), "\"WARN\"");
        let level: LogLevel = serde_json::from_str("\"DEBUG\"").unwrap();
        assert_eq!(level, LogLevel::Debug);
    }
}
