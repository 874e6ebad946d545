//! Logging preferences
//!
//! Level and output format come from the environment unless the binary installs its own
//! preferences before first use. The message length cap is a compile-time limit.

use crate::config::compile_time::logging::MAX_LOG_MESSAGE_LENGTH;
use crate::config::runtime::{LogLevel, LoggingPreferences};
use std::sync::OnceLock;

static PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Fails once preferences were installed or already read
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    PREFERENCES
        .set(preferences)
        .map_err(|_| "Logging preferences already initialized".to_string())
}

pub fn preferences() -> &'static LoggingPreferences {
    PREFERENCES.get_or_init(LoggingPreferences::default)
}

/// JSON lines at info level
pub fn production_preferences() -> LoggingPreferences {
    LoggingPreferences {
        use_structured_logging: true,
        enable_console_logging: false,
        min_log_level: LogLevel::Info,
    }
}

/// Clamp a message to the configured maximum length, on a char boundary
pub fn truncate_message(message: &str) -> &str {
    if message.len() <= MAX_LOG_MESSAGE_LENGTH {
        return message;
    }
    let mut end = MAX_LOG_MESSAGE_LENGTH;
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    &message[..end]
}

pub fn summary() -> String {
    let preferences = preferences();
    format!(
        "Logging:\n\
         - Min level: {}\n\
         - Structured: {}\n\
         - Console: {}\n\
         - Max message length: {}",
        preferences.min_log_level.as_str(),
        preferences.use_structured_logging,
        preferences.enable_console_logging,
        MAX_LOG_MESSAGE_LENGTH,
    )
}
