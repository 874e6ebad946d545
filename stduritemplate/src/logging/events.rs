//! Log events
//!
//! An event is a level, an optional [`Code`], the message, an optional template span and
//! ordered key/value context. Text and JSON renderings are derived from the same fields.

use super::codes::Code;
use crate::utils::Span;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    Debug,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub code: Option<Code>,
    pub message: String,
    pub span: Option<Span>,
    pub context: Vec<(&'static str, String)>,
}

impl LogEvent {
    pub fn new(level: LogLevel, message: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            code: None,
            message: super::config::truncate_message(message).to_string(),
            span: None,
            context: Vec::new(),
        }
    }

    pub fn error(code: Code, message: &str) -> Self {
        debug_assert!(!code.is_success(), "{} is a success code", code);
        Self::new(LogLevel::Error, message).with_code(code)
    }

    /// Info event naming the step that completed
    pub fn success(code: Code, message: &str) -> Self {
        debug_assert!(code.is_success(), "{} is not a success code", code);
        Self::new(LogLevel::Info, message).with_code(code)
    }

    pub fn with_code(mut self, code: Code) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Append one context pair; insertion order is kept in every rendering
    pub fn with(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// One JSON object, for line-oriented log collectors
    pub fn to_json(&self) -> serde_json::Value {
        let mut json = serde_json::json!({
            "timestamp": self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            "level": self.level.as_str(),
            "message": self.message,
        });

        if let Some(code) = self.code {
            json["code"] = code.as_str().into();
            json["stage"] = code.stage().as_str().into();
        }

        if let Some(span) = self.span {
            json["line"] = span.start.line.into();
            json["column"] = span.start.column.into();
        }

        for (key, value) in &self.context {
            json["context"][*key] = value.as_str().into();
        }

        json
    }
}

/// `E020 Illegal character at 1:4-5 (character=!)`
impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(code) = self.code {
            write!(f, "{} ", code)?;
        }
        f.write_str(&self.message)?;
        if let Some(span) = self.span {
            write!(f, " at {}", span)?;
        }
        for (i, (key, value)) in self.context.iter().enumerate() {
            let open = if i == 0 { " (" } else { ", " };
            write!(f, "{}{}={}", open, key, value)?;
        }
        if !self.context.is_empty() {
            f.write_str(")")?;
        }
        Ok(())
    }
}
