//! Coded logging for stduritemplate
//!
//! The library logs through one global [`LoggingService`]. Until a binary installs one,
//! every macro is a no-op, so embedding the crate needs no setup. Conformance workers tag
//! their events with the suite and group they are running through a thread-local context.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use crate::log_success;
use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, JsonLinesLogger, Logger, LoggingService};

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

thread_local! {
    static SUITE_CONTEXT: RefCell<Option<SuiteContext>> = const { RefCell::new(None) };
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SuiteContext {
    suite_path: PathBuf,
    group: String,
}

/// Install the service described by [`config::preferences`]. Leaves logging off when
/// the preferences enable no output.
pub fn init_global_logging() -> Result<(), String> {
    match LoggingService::from_preferences(config::preferences()) {
        Some(service) => init_global_logging_with_service(Arc::new(service)),
        None => Ok(()),
    }
}

pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())?;

    log_success!(codes::system::LOGGING_INITIALIZED, "Global logging initialized",
        "profile" => crate::config::build_info::profile()
    );

    Ok(())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

/// Build and dispatch an event if the global logger accepts `level`
pub fn emit(level: LogLevel, build: impl FnOnce() -> LogEvent) {
    let Some(service) = GLOBAL_LOGGER.get() else {
        return;
    };
    if !service.enabled(level) {
        return;
    }

    let mut event = build();
    SUITE_CONTEXT.with(|ctx| {
        if let Some(ctx) = ctx.borrow().as_ref() {
            event.context.push(("suite", ctx.suite_path.display().to_string()));
            event.context.push(("group", ctx.group.clone()));
        }
    });
    service.dispatch(&event);
}

/// Run `f` with events on this thread tagged by suite file and group
pub fn with_suite_context<F, R>(suite_path: PathBuf, group: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = SUITE_CONTEXT.with(|ctx| {
        ctx.replace(Some(SuiteContext {
            suite_path,
            group: group.to_string(),
        }))
    });
    let result = f();
    SUITE_CONTEXT.with(|ctx| *ctx.borrow_mut() = previous);
    result
}

/// Logs through the global logger when there is one, else straight to stderr
pub fn safe_log_error(code: Code, message: &str) {
    match GLOBAL_LOGGER.get() {
        Some(service) => service.dispatch(&LogEvent::error(code, message)),
        None => eprintln!("[ERROR] {} {}", code, message),
    }
}

pub fn diagnostics() -> String {
    format!(
        "Logger installed: {}\n{}",
        is_initialized(),
        config::summary()
    )
}

/// In-memory sink for tests. [`capture::global`] installs it as the crate's global
/// logger; no other test may install one.
#[cfg(test)]
pub(crate) mod capture {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MemoryLogger {
        events: Mutex<Vec<LogEvent>>,
    }

    impl MemoryLogger {
        pub fn events(&self) -> Vec<LogEvent> {
            self.events.lock().map(|events| events.clone()).unwrap_or_default()
        }
    }

    impl Logger for MemoryLogger {
        fn log(&self, event: &LogEvent) {
            if let Ok(mut events) = self.events.lock() {
                events.push(event.clone());
            }
        }
    }

    static GLOBAL_CAPTURE: OnceLock<Arc<MemoryLogger>> = OnceLock::new();

    /// Info and above from every thread
    pub fn global() -> Arc<MemoryLogger> {
        GLOBAL_CAPTURE
            .get_or_init(|| {
                let logger = Arc::new(MemoryLogger::default());
                let service = LoggingService::new(logger.clone(), LogLevel::Info);
                init_global_logging_with_service(Arc::new(service))
                    .expect("no other test installs a global logger");
                logger
            })
            .clone()
    }

    /// Events carrying `value` anywhere in their context
    pub fn tagged(value: &str) -> Vec<LogEvent> {
        global()
            .events()
            .into_iter()
            .filter(|e| e.context.iter().any(|(_, v)| v == value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_info;

    #[test]
    fn test_suite_context_tags_events() {
        capture::global();
        let marker = "suite-context-tags-events";

        with_suite_context(PathBuf::from("extended-tests.json"), "Additional Examples 1", || {
            log_info!("Running group", "marker" => marker);
        });
        log_info!("After group", "marker" => marker);

        let events = capture::tagged(marker);
        assert_eq!(events.len(), 2);
        assert!(events[0]
            .context
            .contains(&("group", "Additional Examples 1".to_string())));
        assert!(!events[1].context.iter().any(|(key, _)| *key == "group"));
    }

    #[test]
    fn test_nested_context_restores_outer() {
        let inner = with_suite_context(PathBuf::from("a.json"), "outer", || {
            with_suite_context(PathBuf::from("b.json"), "inner", || ());
            SUITE_CONTEXT.with(|ctx| ctx.borrow().as_ref().map(|c| c.group.clone()))
        });
        assert_eq!(inner.as_deref(), Some("outer"));
        assert!(SUITE_CONTEXT.with(|ctx| ctx.borrow().is_none()));
    }

    #[test]
    fn test_safe_log_error_and_diagnostics() {
        safe_log_error(codes::system::INTERNAL_ERROR, "Test error");
        assert!(diagnostics().contains("Logger installed"));
    }
}
