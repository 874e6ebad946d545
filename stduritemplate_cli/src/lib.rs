//! # stduritemplate CLI
//!
//! File loading, suite discovery and log forwarding for the `stduritemplate` binary.

use stduritemplate::config::runtime::{self, LoggingPreferences};
use stduritemplate::conformance::{self, ConformanceError, ConformanceResults, RunnerConfig};
use stduritemplate::logging::codes;
use stduritemplate::logging::{self, LogEvent, LogLevel, Logger, LoggingService};
use stduritemplate::substitution::from_json_with_timestamps;
use stduritemplate::{log_error, log_info, Substitutions, UriTemplate, UriTemplateError};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("File '{path}' not found.")]
    FileNotFound { path: String },

    #[error("Cannot read '{path}': {error}")]
    Io { path: String, error: String },

    #[error("Invalid JSON in '{path}': {error}")]
    InvalidJson { path: String, error: String },

    #[error("No suite files found under '{path}'")]
    NoSuites { path: String },

    #[error(transparent)]
    Template(#[from] UriTemplateError),

    /// Scan or expansion failure rendered against the template text
    #[error("{diagnostic}")]
    Expansion {
        diagnostic: String,
        error: UriTemplateError,
    },

    #[error(transparent)]
    Conformance(#[from] ConformanceError),
}

// ============================================================================
// LOG FORWARDING
// ============================================================================

/// Forwards library events to the `log` facade so `env_logger` decides what is shown
pub struct LogBridge;

impl Logger for LogBridge {
    fn log(&self, event: &LogEvent) {
        let level = match event.level {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warning => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
        };

        log::log!(target: "stduritemplate", level, "{}", event);
    }
}

/// Library events pass through only from `-v` up; stdout stays reserved for results.
/// With `structured`, the library's own JSON-lines logger writes to stderr instead.
pub fn init_logging(verbosity: u8, structured: bool) -> Result<(), String> {
    let (filter, min_level) = match verbosity {
        0 => ("warn", runtime::LogLevel::Warning),
        1 => ("info", runtime::LogLevel::Info),
        _ => ("debug", runtime::LogLevel::Debug),
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .try_init()
        .map_err(|e| e.to_string())?;

    if structured {
        logging::config::init_runtime_preferences(LoggingPreferences {
            min_log_level: min_level,
            ..logging::config::production_preferences()
        })?;
        logging::init_global_logging()?;
    } else if verbosity > 0 {
        logging::init_global_logging_with_service(Arc::new(LoggingService::new(
            Arc::new(LogBridge),
            min_level.to_events_log_level(),
        )))?;
    }

    stduritemplate::lexical::init_scanner_logging();
    Ok(())
}

// ============================================================================
// EXPAND
// ============================================================================

fn read_file(path: &Path) -> Result<String, CliError> {
    let display = path.display().to_string();

    if !path.is_file() {
        log_error!(codes::input::FILE_NOT_FOUND, "Input file not found",
            "file" => &display
        );
        return Err(CliError::FileNotFound { path: display });
    }

    fs::read_to_string(path).map_err(|e| {
        log_error!(codes::input::IO_ERROR, "Cannot read input file",
            "file" => &display,
            "error" => &e
        );
        CliError::Io {
            path: display.clone(),
            error: e.to_string(),
        }
    })
}

/// Template file contents with surrounding whitespace removed
pub fn load_template(path: &Path) -> Result<String, CliError> {
    Ok(read_file(path)?.trim().to_string())
}

/// JSON object from `path`; numeric `nativedate`/`nativedatetwo` members are epoch
/// milliseconds and expand as RFC 3339 timestamps
pub fn load_substitutions(path: &Path) -> Result<Substitutions, CliError> {
    let content = read_file(path)?;

    let data: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
        log_error!(codes::input::INVALID_JSON, "Substitution file is not valid JSON",
            "file" => path.display(),
            "error" => &e
        );
        CliError::InvalidJson {
            path: path.display().to_string(),
            error: e.to_string(),
        }
    })?;

    Ok(from_json_with_timestamps(&data).map_err(UriTemplateError::from)?)
}

/// Expand the template in `template_path` against the JSON object in `data_path`
pub fn run_expand(template_path: &Path, data_path: &Path) -> Result<String, CliError> {
    let text = load_template(template_path)?;
    let substitutions = load_substitutions(data_path)?;

    log_info!("Expanding template",
        "template" => template_path.display(),
        "template_bytes" => text.len(),
        "variables" => substitutions.len()
    );

    UriTemplate::parse(&text)
        .and_then(|template| template.expand(&substitutions))
        .map_err(|error| CliError::Expansion {
            diagnostic: error.render(&text),
            error,
        })
}

// ============================================================================
// CONFORMANCE
// ============================================================================

/// Files are taken as given; directories are searched for `*.json`
pub fn discover_suites(paths: &[PathBuf]) -> Result<Vec<PathBuf>, CliError> {
    let mut suites = Vec::new();

    for path in paths {
        if path.is_file() {
            suites.push(path.clone());
        } else if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .into_iter()
                .filter_map(Result::ok)
                .map(|entry| entry.into_path())
                .filter(|p| p.is_file() && is_suite_file(p))
                .collect();

            if found.is_empty() {
                return Err(CliError::NoSuites {
                    path: path.display().to_string(),
                });
            }

            found.sort();
            suites.extend(found);
        } else {
            return Err(CliError::FileNotFound {
                path: path.display().to_string(),
            });
        }
    }

    Ok(suites)
}

fn is_suite_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

pub fn run_conformance(paths: &[PathBuf], config: &RunnerConfig) -> Result<ConformanceResults, CliError> {
    let suites = discover_suites(paths)?;

    log_info!("Starting conformance run",
        "suites" => suites.len(),
        "threads" => config.max_threads,
        "parallel" => config.parallel
    );

    Ok(conformance::run_suites(&suites, config)?)
}
