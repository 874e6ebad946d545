//! Scan-then-expand pipeline
//!
//! Every call scans the template in full before any value is looked up, so a malformed
//! template fails the same way whatever the substitutions hold.

mod error;
mod template;

pub use error::UriTemplateError;
pub use template::UriTemplate;

use crate::logging::codes;
use crate::substitution::Substitutions;
use std::time::Instant;

/// Scan and expand `template` against `substitutions`.
///
/// Besides malformed templates and values, a build refuses inputs past its compile-time
/// limits: [`MAX_TEMPLATE_SIZE`] bytes or [`MAX_EXPRESSION_COUNT`] expressions fail the
/// scan with `TemplateTooLarge` / `TooManyExpressions`, and results longer than
/// [`MAX_OUTPUT_SIZE`] bytes fail with `OutputTooLarge`. Both shipped profiles set
/// 1 MiB, 65,536 and 64 MiB.
///
/// [`MAX_TEMPLATE_SIZE`]: crate::config::compile_time::template::MAX_TEMPLATE_SIZE
/// [`MAX_EXPRESSION_COUNT`]: crate::config::compile_time::template::MAX_EXPRESSION_COUNT
/// [`MAX_OUTPUT_SIZE`]: crate::config::compile_time::expansion::MAX_OUTPUT_SIZE
pub fn expand(template: &str, substitutions: &Substitutions) -> Result<String, UriTemplateError> {
    let start_time = Instant::now();

    let parsed = UriTemplate::parse(template)?;
    let expanded = parsed.expand(substitutions)?;

    crate::log_performance!(codes::expansion::TEMPLATE_EXPANDED,
        "Template pipeline completed",
        duration = start_time.elapsed(),
        "template_bytes" => template.len(),
        "output_bytes" => expanded.len()
    );

    Ok(expanded)
}

/// Normalize a JSON object into substitutions, then scan and expand
pub fn expand_json(template: &str, data: &serde_json::Value) -> Result<String, UriTemplateError> {
    let substitutions = Substitutions::from_json(data)?;
    expand(template, &substitutions)
}
