//! Template scanning module
//!
//! Turns template text into a [`ParsedTemplate`] using an explicit state machine.

pub mod analyzer;

use crate::config::compile_time::template::*;
use crate::config::runtime::ScannerPreferences;
use crate::tokens::ParsedTemplate;

pub use analyzer::{is_illegal_name_char, ScanError, ScanMetrics, TemplateScanner};

/// Scan a template with default preferences
pub fn scan(template: &str) -> Result<ParsedTemplate, ScanError> {
    TemplateScanner::new().scan(template)
}

/// Scan with custom runtime preferences (size limits remain compile-time)
pub fn scan_with_preferences(
    template: &str,
    preferences: ScannerPreferences,
) -> Result<ParsedTemplate, ScanError> {
    TemplateScanner::with_preferences(preferences).scan(template)
}

/// Report the scanner's compile-time limits once logging is up
pub fn init_scanner_logging() {
    crate::log_debug!("Scanner limits initialized",
        "max_template_size" => MAX_TEMPLATE_SIZE,
        "max_expression_count" => MAX_EXPRESSION_COUNT
    );
}
