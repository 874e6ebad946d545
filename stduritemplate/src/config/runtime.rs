// RUNTIME PREFERENCES (User Experience)

use std::env;

#[derive(Debug, Clone)]
pub struct ScannerPreferences {
    /// Whether to count operator usage while scanning
    pub track_operator_usage: bool,

    /// Whether to log every scanned expression at debug level
    pub log_expression_details: bool,
}

impl Default for ScannerPreferences {
    fn default() -> Self {
        Self {
            track_operator_usage: env::var(env_vars::SCANNER_TRACK_OPERATORS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            log_expression_details: env::var(env_vars::SCANNER_LOG_EXPRESSIONS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConformancePreferences {
    /// Whether groups run on worker threads
    pub parallel: bool,

    /// Whether the first failing case stops the run
    pub fail_fast: bool,
}

impl Default for ConformancePreferences {
    fn default() -> Self {
        Self {
            parallel: env::var(env_vars::CONFORMANCE_PARALLEL)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            fail_fast: env::var(env_vars::CONFORMANCE_FAIL_FAST)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to enable console output
    pub enable_console_logging: bool,

    /// Minimum level that reaches the configured logger
    pub min_log_level: LogLevel,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var(env_vars::LOGGING_USE_STRUCTURED)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var(env_vars::LOGGING_ENABLE_CONSOLE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
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

    /// Convert to events::LogLevel
    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Scanner
    pub const SCANNER_TRACK_OPERATORS: &str = "STDURITEMPLATE_SCANNER_TRACK_OPERATORS";
    pub const SCANNER_LOG_EXPRESSIONS: &str = "STDURITEMPLATE_SCANNER_LOG_EXPRESSIONS";

    // Conformance
    pub const CONFORMANCE_PARALLEL: &str = "STDURITEMPLATE_CONFORMANCE_PARALLEL";
    pub const CONFORMANCE_FAIL_FAST: &str = "STDURITEMPLATE_CONFORMANCE_FAIL_FAST";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "STDURITEMPLATE_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "STDURITEMPLATE_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "STDURITEMPLATE_LOGGING_MIN_LEVEL";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("0"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("warning"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("1"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("info"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("2"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("3"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("invalid"), None);
    }

    #[test]
    fn test_env_var_names_share_prefix() {
        for name in [
            env_vars::SCANNER_TRACK_OPERATORS,
            env_vars::SCANNER_LOG_EXPRESSIONS,
            env_vars::CONFORMANCE_PARALLEL,
            env_vars::CONFORMANCE_FAIL_FAST,
            env_vars::LOGGING_USE_STRUCTURED,
            env_vars::LOGGING_ENABLE_CONSOLE,
            env_vars::LOGGING_MIN_LEVEL,
        ] {
            assert!(name.starts_with("STDURITEMPLATE_"));
        }
    }

    #[test]
    fn test_log_level_conversion() {
        use crate::logging::events::LogLevel as EventsLogLevel;
        assert_eq!(LogLevel::Debug.to_events_log_level(), EventsLogLevel::Debug);
        assert_eq!(LogLevel::Error.to_events_log_level(), EventsLogLevel::Error);
        assert_eq!(LogLevel::Warning.as_str(), "WARN");
    }
}
