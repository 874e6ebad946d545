use crate::config::compile_time::conformance::MAX_SUITE_FILE_SIZE;
use crate::logging::codes;

/// Suite loading errors. Case failures are results, not errors.
#[derive(Debug, thiserror::Error)]
pub enum ConformanceError {
    #[error("Cannot read suite '{path}': {error}")]
    Io { path: String, error: String },

    #[error("Suite '{path}' too large: {size} bytes (max {MAX_SUITE_FILE_SIZE})")]
    SuiteTooLarge { path: String, size: u64 },

    #[error("Malformed suite '{path}': {message}")]
    Parse { path: String, message: String },

    #[error("Worker thread panicked while running '{path}'")]
    WorkerPanicked { path: String },
}

impl ConformanceError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            ConformanceError::Io { .. } => codes::conformance::SUITE_READ_ERROR,
            ConformanceError::SuiteTooLarge { .. } => codes::conformance::SUITE_TOO_LARGE,
            ConformanceError::Parse { .. } => codes::conformance::SUITE_PARSE_ERROR,
            ConformanceError::WorkerPanicked { .. } => codes::system::INTERNAL_ERROR,
        }
    }
}
