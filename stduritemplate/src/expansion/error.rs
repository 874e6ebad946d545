use crate::config::compile_time::expansion::MAX_OUTPUT_SIZE;
use crate::logging::codes;

/// Errors raised while resolving varspecs against substitutions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpansionError {
    #[error("Found an empty token at column {column}")]
    EmptyToken { column: u32 },

    #[error("Value trimming is not allowed on maps ('{name}' at column {column})")]
    MapTrimmingUnsupported { name: String, column: u32 },

    #[error("Expanded output too large: {size} bytes (max {MAX_OUTPUT_SIZE})")]
    OutputTooLarge { size: usize },
}

impl ExpansionError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            ExpansionError::EmptyToken { .. } => codes::expansion::EMPTY_TOKEN,
            ExpansionError::MapTrimmingUnsupported { .. } => {
                codes::expansion::MAP_TRIMMING_UNSUPPORTED
            }
            ExpansionError::OutputTooLarge { .. } => codes::expansion::OUTPUT_TOO_LARGE,
        }
    }

    pub fn column(&self) -> Option<u32> {
        match self {
            ExpansionError::EmptyToken { column }
            | ExpansionError::MapTrimmingUnsupported { column, .. } => Some(*column),
            ExpansionError::OutputTooLarge { .. } => None,
        }
    }
}
