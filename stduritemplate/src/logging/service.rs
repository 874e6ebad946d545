//! Logging service and sinks
//!
//! Both built-in sinks write to stderr; stdout belongs to expansion results.

use super::events::{LogEvent, LogLevel};
use crate::config::runtime::LoggingPreferences;
use std::sync::Arc;

/// Destination for events that passed the level filter
pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Level filter in front of one sink
pub struct LoggingService {
    sink: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    pub fn new(sink: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { sink, min_level }
    }

    /// JSON lines when structured logging is preferred, plain text otherwise.
    /// `None` when neither structured nor console output is enabled.
    pub fn from_preferences(preferences: &LoggingPreferences) -> Option<Self> {
        let sink: Arc<dyn Logger> = if preferences.use_structured_logging {
            Arc::new(JsonLinesLogger)
        } else if preferences.enable_console_logging {
            Arc::new(ConsoleLogger)
        } else {
            return None;
        };

        Some(Self::new(sink, preferences.min_log_level.to_events_log_level()))
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    pub fn dispatch(&self, event: &LogEvent) {
        if self.enabled(event.level) {
            self.sink.log(event);
        }
    }
}

/// `[LEVEL] event` lines
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        eprintln!("[{}] {}", event.level.as_str(), event);
    }
}

pub struct JsonLinesLogger;

impl Logger for JsonLinesLogger {
    fn log(&self, event: &LogEvent) {
        eprintln!("{}", event.to_json());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::runtime::LogLevel as PreferredLevel;
    use crate::logging::capture::MemoryLogger;
    use crate::logging::codes;

    #[test]
    fn test_dispatch_filters_by_level() {
        let sink = Arc::new(MemoryLogger::default());
        let service = LoggingService::new(sink.clone(), LogLevel::Warning);

        service.dispatch(&LogEvent::new(LogLevel::Debug, "scanning"));
        service.dispatch(&LogEvent::success(codes::scan::TEMPLATE_SCANNED, "scanned"));
        service.dispatch(&LogEvent::new(LogLevel::Warning, "suite failed"));
        service.dispatch(&LogEvent::error(codes::expansion::EMPTY_TOKEN, "empty"));

        let levels: Vec<LogLevel> = sink.events().iter().map(|e| e.level).collect();
        assert_eq!(levels, vec![LogLevel::Warning, LogLevel::Error]);
        assert!(service.enabled(LogLevel::Error));
        assert!(!service.enabled(LogLevel::Info));
    }

    #[test]
    fn test_preferences_pick_sink() {
        let silent = LoggingPreferences {
            use_structured_logging: false,
            enable_console_logging: false,
            min_log_level: PreferredLevel::Info,
        };
        assert!(LoggingService::from_preferences(&silent).is_none());

        let structured = LoggingPreferences {
            use_structured_logging: true,
            min_log_level: PreferredLevel::Debug,
            ..silent
        };
        let service = LoggingService::from_preferences(&structured);
        assert!(service.is_some_and(|s| s.enabled(LogLevel::Debug)));
    }

    #[test]
    fn test_builtin_sinks_write_without_panicking() {
        let event = LogEvent::error(codes::scan::UNTERMINATED_EXPRESSION, "Unterminated")
            .with("template", "{abc");
        ConsoleLogger.log(&event);
        JsonLinesLogger.log(&event);
    }
}
