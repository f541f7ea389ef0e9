//! Log viewer models.
//!
//! The logs themselves live on the upstream API as plain text; these types turn
//! that text into filtered, level-tagged lines.

use serde::{Deserialize, Serialize};

/// Which upstream log file to read.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogType {
    #[default]
    App,
    Access,
}

impl LogType {
    /// Upstream path serving this log as text.
    pub fn download_path(self) -> &'static str {
        match self {
            Self::App => "/api/logs/download",
            Self::Access => "/api/logs/access",
        }
    }
}

/// Severity guessed from the line text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    Plain,
}

impl LogLevel {
    /// First match wins, so a line mentioning both "ERROR" and "info" is an error.
    pub fn classify(line: &str) -> Self {
        if line.contains("ERROR") || line.contains("error") {
            Self::Error
        } else if line.contains("WARNING") || line.contains("warning") {
            Self::Warning
        } else if line.contains("INFO") || line.contains("info") {
            Self::Info
        } else {
            Self::Plain
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LogLine {
    pub text: String,
    pub level: LogLevel,
}

/// `GET /api/logs` response.
#[derive(Debug, Clone, Serialize)]
pub struct LogView {
    pub log_type: LogType,
    /// Non-blank lines before filtering.
    pub total: usize,
    pub lines: Vec<LogLine>,
}

impl LogView {
    /// Split `text` into non-blank lines and keep those containing `filter`, ignoring case.
    pub fn from_text(log_type: LogType, text: &str, filter: Option<&str>) -> Self {
        let needle = filter
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_lowercase);

        let mut total = 0;
        let lines = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .inspect(|_| total += 1)
            .filter(|line| match &needle {
                Some(n) => line.to_lowercase().contains(n.as_str()),
                None => true,
            })
            .map(|line| LogLine {
                text: line.to_owned(),
                level: LogLevel::classify(line),
            })
            .collect();

        Self {
            log_type,
            total,
            lines,
        }
    }
}

/// `GET /api/logs` query string.
#[derive(Debug, Default, Deserialize)]
pub struct LogQuery {
    #[serde(rename = "type", default)]
    pub log_type: LogType,
    pub filter: Option<String>,
}

/// `POST /api/logs/clear`, also forwarded verbatim to the upstream.
///
/// The upstream reads `logType`; `log_type` is accepted from callers too.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ClearLogsRequest {
    #[serde(rename = "logType", alias = "log_type", default)]
    pub log_type: LogType,
}
