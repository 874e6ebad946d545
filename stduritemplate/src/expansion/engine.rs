//! Expansion engine
//!
//! Walks a [`ParsedTemplate`], copying literals and resolving each expression against
//! a read-only [`Substitutions`] bag. The output buffer is owned by the call and is
//! discarded on error.

use super::error::ExpansionError;
use super::serializer::{write_list, write_map, write_string};
use crate::config::compile_time::expansion::MAX_OUTPUT_SIZE;
use crate::logging::codes;
use crate::substitution::{Substitutions, Value};
use crate::tokens::{Expression, ParsedTemplate, TemplatePart};
use crate::{log_debug, log_error, log_success};

/// Counters from the most recent expansion
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExpansionMetrics {
    pub expressions: usize,
    pub varspecs_expanded: usize,
    pub varspecs_skipped: usize,
    pub output_bytes: usize,
}

/// Expands parsed templates against a substitution bag
pub struct ExpansionEngine<'a> {
    substitutions: &'a Substitutions,
    metrics: ExpansionMetrics,
}

impl<'a> ExpansionEngine<'a> {
    pub fn new(substitutions: &'a Substitutions) -> Self {
        Self {
            substitutions,
            metrics: ExpansionMetrics::default(),
        }
    }

    pub fn expand(&mut self, template: &ParsedTemplate) -> Result<String, ExpansionError> {
        self.metrics = ExpansionMetrics::default();

        log_debug!("Starting expansion",
            "parts" => template.parts().len(),
            "substitutions" => self.substitutions.len()
        );

        let mut out = String::with_capacity(template.literal_len());

        for part in template.parts() {
            match part {
                TemplatePart::Literal(text) => out.push_str(text),
                TemplatePart::Expression(expression) => {
                    if let Err(error) = self.expand_expression(&mut out, expression) {
                        log_error!(error.error_code(), "Expansion failed",
                            span = expression.span,
                            "expression" => expression,
                            "error" => &error
                        );
                        return Err(error);
                    }
                }
            }

            if out.len() > MAX_OUTPUT_SIZE {
                let error = ExpansionError::OutputTooLarge { size: out.len() };
                log_error!(error.error_code(), "Expansion output limit exceeded",
                    "size" => out.len(),
                    "limit" => MAX_OUTPUT_SIZE
                );
                return Err(error);
            }
        }

        self.metrics.output_bytes = out.len();

        log_success!(codes::expansion::TEMPLATE_EXPANDED,
            "Template expanded successfully",
            "expressions" => self.metrics.expressions,
            "expanded" => self.metrics.varspecs_expanded,
            "skipped" => self.metrics.varspecs_skipped,
            "output_bytes" => out.len()
        );

        Ok(out)
    }

    pub fn metrics(&self) -> &ExpansionMetrics {
        &self.metrics
    }

    fn expand_expression(
        &mut self,
        out: &mut String,
        expression: &Expression,
    ) -> Result<(), ExpansionError> {
        self.metrics.expressions += 1;
        let operator = expression.operator;
        let mut first = true;

        for varspec in &expression.varspecs {
            if varspec.is_empty() {
                return Err(ExpansionError::EmptyToken {
                    column: varspec.end_column(),
                });
            }

            let value = match self.substitutions.get(&varspec.name) {
                Some(value) if !value.is_empty() => value,
                _ => {
                    self.metrics.varspecs_skipped += 1;
                    continue;
                }
            };

            if first {
                if let Some(prefix) = operator.prefix() {
                    out.push(prefix);
                }
            } else {
                out.push(operator.separator());
            }

            match value {
                Value::String(text) => write_string(out, operator, varspec, text),
                Value::List(items) => write_list(out, operator, varspec, items),
                Value::Map(pairs) => write_map(out, operator, varspec, pairs)?,
            }

            self.metrics.varspecs_expanded += 1;
            first = false;
        }

        Ok(())
    }
}

/// Expand a parsed template in one call
pub fn expand(template: &ParsedTemplate, substitutions: &Substitutions) -> Result<String, ExpansionError> {
    ExpansionEngine::new(substitutions).expand(template)
}
