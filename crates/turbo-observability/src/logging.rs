//! Request-scoped structured log lines.
//!
//! One [`StructuredLogger`] is created per feed request. Every line it
//! writes carries the request id, so the summary of a request can be
//! joined with the `tracing` events emitted while it ran.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::RequestId;

/// Severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
        ]
        .into_iter()
        .find(|level| level.as_str().eq_ignore_ascii_case(s))
        .or_else(|| s.eq_ignore_ascii_case("warning").then_some(LogLevel::Warn))
        .ok_or_else(|| format!("unknown log level: {}", s))
    }
}

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// `LEVEL request [component] message key=value`.
    Human,
}

/// One rendered log line before formatting.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub level: LogLevel,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    pub message: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
    pub elapsed_us: u64,
}

impl LogRecord {
    pub fn json_line(&self) -> String {
        // Field values are already JSON, so this cannot fail in practice.
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }

    pub fn human_line(&self) -> String {
        let mut line = format!("{:<5} {}", self.level, self.request_id);
        if let Some(component) = &self.component {
            line.push_str(&format!(" [{}]", component));
        }
        line.push(' ');
        line.push_str(&self.message);
        for (key, value) in &self.fields {
            line.push_str(&format!(" {}={}", key, value));
        }
        line.push_str(&format!(" +{}us", self.elapsed_us));
        line
    }
}

/// Logger bound to one request.
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    request_id: RequestId,
    component: Option<String>,
    started: Instant,
    min_level: LogLevel,
    format: LogFormat,
}

impl StructuredLogger {
    pub fn new(request_id: RequestId) -> Self {
        Self {
            request_id,
            component: None,
            started: Instant::now(),
            min_level: LogLevel::default(),
            format: LogFormat::default(),
        }
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Drop lines below `level`.
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn info_with(&self, message: &str, fields: &[(&str, serde_json::Value)]) {
        self.emit(LogLevel::Info, message, fields);
    }

    pub fn warn_with(&self, message: &str, fields: &[(&str, serde_json::Value)]) {
        self.emit(LogLevel::Warn, message, fields);
    }

    pub fn error_with(&self, message: &str, fields: &[(&str, serde_json::Value)]) {
        self.emit(LogLevel::Error, message, fields);
    }

    /// Write a line to stderr unless filtered out.
    pub fn emit(&self, level: LogLevel, message: &str, fields: &[(&str, serde_json::Value)]) {
        if let Some(line) = self.render(level, message, fields) {
            eprintln!("{}", line);
        }
    }

    /// Format a line without writing it. `None` when below the minimum level.
    pub fn render(
        &self,
        level: LogLevel,
        message: &str,
        fields: &[(&str, serde_json::Value)],
    ) -> Option<String> {
        if level < self.min_level {
            return None;
        }

        let record = self.record(level, message, fields);
        Some(match self.format {
            LogFormat::Json => record.json_line(),
            LogFormat::Human => record.human_line(),
        })
    }

    fn record(&self, level: LogLevel, message: &str, fields: &[(&str, serde_json::Value)]) -> LogRecord {
        LogRecord {
            level,
            request_id: self.request_id.as_str().to_string(),
            component: self.component.clone(),
            message: message.to_string(),
            fields: fields
                .iter()
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect(),
            elapsed_us: self.elapsed_us(),
        }
    }

    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    /// Microseconds since the logger was created.
    pub fn elapsed_us(&self) -> u64 {
        self.started.elapsed().as_micros() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn logger() -> StructuredLogger {
        StructuredLogger::new(RequestId::from_string("req-42")).with_component("feed")
    }

    #[test]
    fn test_json_line_carries_request_context() {
        let line = logger()
            .render(LogLevel::Info, "feed served", &[("items", json!(12))])
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["request_id"], "req-42");
        assert_eq!(parsed["component"], "feed");
        assert_eq!(parsed["level"], "info");
        assert_eq!(parsed["items"], 12);
        assert!(parsed["elapsed_us"].is_u64());
    }

    #[test]
    fn test_human_line() {
        let line = logger()
            .with_format(LogFormat::Human)
            .render(
                LogLevel::Warn,
                "slow fetch",
                &[("tab", json!("trending")), ("rows", json!(100))],
            )
            .unwrap();
        assert!(line.starts_with("WARN  req-42 [feed] slow fetch rows=100 tab=\"trending\" +"));
        assert!(line.ends_with("us"));
    }

    #[test]
    fn test_min_level_filters() {
        let logger = logger().with_min_level(LogLevel::Warn);
        assert!(logger.render(LogLevel::Info, "skipped", &[]).is_none());
        assert!(logger.render(LogLevel::Error, "kept", &[]).is_some());
    }

    #[test]
    fn test_parse_level() {
        assert_eq!("DEBUG".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!("warning".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!("error".parse::<LogLevel>(), Ok(LogLevel::Error));
        assert!("loud".parse::<LogLevel>().is_err());
    }
}
