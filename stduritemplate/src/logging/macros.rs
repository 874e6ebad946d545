//! Logging macros
//!
//! Each macro hands [`emit`](crate::logging::emit) a closure that builds the event, so
//! nothing is formatted unless a global logger accepts the level. Context values are
//! borrowed and rendered through `Display`:
//!
//! ```ignore
//! log_error!(error.error_code(), "Template scan failed",
//!     span = span,
//!     "character" => ch
//! );
//! ```

#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr, span = $span:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::emit($crate::logging::LogLevel::Error, || {
            $crate::logging::LogEvent::error($code, $message)
                .with_span($span)
                $(.with($key, &$value))*
        })
    };

    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::emit($crate::logging::LogLevel::Error, || {
            $crate::logging::LogEvent::error($code, $message)
                $(.with($key, &$value))*
        })
    };
}

#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::emit($crate::logging::LogLevel::Info, || {
            $crate::logging::LogEvent::success($code, $message)
                $(.with($key, &$value))*
        })
    };
}

/// Uncoded event at an explicit level; backs the three macros below
#[doc(hidden)]
#[macro_export]
macro_rules! log_at {
    ($level:ident, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::emit($crate::logging::LogLevel::$level, || {
            $crate::logging::LogEvent::new($crate::logging::LogLevel::$level, $message)
                $(.with($key, &$value))*
        })
    };
}

#[macro_export]
macro_rules! log_info {
    ($($args:tt)+) => {
        $crate::log_at!(Info, $($args)+)
    };
}

#[macro_export]
macro_rules! log_warning {
    ($($args:tt)+) => {
        $crate::log_at!(Warning, $($args)+)
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($args:tt)+) => {
        $crate::log_at!(Debug, $($args)+)
    };
}

/// Success event with the elapsed milliseconds as the first context pair
#[macro_export]
macro_rules! log_performance {
    ($code:expr, $message:expr, duration = $duration:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::log_success!($code, $message,
            "duration_ms" => format!("{:.3}", $duration.as_secs_f64() * 1000.0)
            $(, $key => $value)*
        )
    };
}

#[cfg(test)]
mod tests {
    use crate::logging::{capture, codes};
    use crate::utils::{Position, Span};
    use std::time::Duration;

    #[test]
    fn test_macros_reach_installed_logger() {
        let logger = capture::global();
        let start = Position::start();
        let marker = "macros-reach-installed-logger";

        log_error!(codes::scan::ILLEGAL_CHARACTER, "Illegal character",
            span = Span::new(start, start.advance('!')),
            "marker" => marker,
            "character" => '!'
        );
        log_success!(codes::scan::TEMPLATE_SCANNED, "Scanned", "marker" => marker);
        log_info!("Loading substitutions", "marker" => marker, "count" => 4);
        log_warning!("Suite has failing cases", "marker" => marker);
        log_performance!(codes::expansion::TEMPLATE_EXPANDED, "Expanded",
            duration = Duration::from_millis(12),
            "marker" => marker
        );

        let mine: Vec<_> = logger
            .events()
            .into_iter()
            .filter(|e| e.context.iter().any(|(_, v)| v == marker))
            .collect();

        assert_eq!(mine.len(), 5);
        assert_eq!(mine[0].span.map(|s| s.start.column), Some(1));
        assert_eq!(mine[0].context[1], ("character", "!".to_string()));
        assert_eq!(mine[4].context[0], ("duration_ms", "12.000".to_string()));
        assert_eq!(mine[4].code, Some(codes::expansion::TEMPLATE_EXPANDED));
    }

    #[test]
    fn test_debug_is_filtered_at_info() {
        let logger = capture::global();
        let marker = "debug-is-filtered";

        log_debug!("Entering expression", "marker" => marker);

        assert!(!logger
            .events()
            .iter()
            .any(|e| e.context.iter().any(|(_, v)| v == marker)));
    }
}
