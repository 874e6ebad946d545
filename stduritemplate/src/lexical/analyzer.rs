//! Template scanner
//!
//! A character-at-a-time state machine that splits a template into literal runs and
//! `{...}` expressions. Each expression's operator, varspec names and modifiers are
//! validated here; resolving names against substitutions is left to the expansion
//! engine.

use crate::config::compile_time::template::*;
use crate::config::runtime::ScannerPreferences;
use crate::logging::codes;
use crate::tokens::{Expression, Operator, ParsedTemplate, TemplatePart, VarSpec};
use crate::utils::{Position, Span};
use crate::{log_debug, log_error, log_success};
use std::collections::HashMap;

/// Template scanning errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("Illegal character '{character}' identified in the token at line {line}, column {column}")]
    IllegalCharacter {
        character: char,
        line: u32,
        column: u32,
    },

    #[error("Unterminated token")]
    UnterminatedToken,

    #[error("Closing brace without matching '{{' at line {line}, column {column}")]
    UnexpectedClosingBrace { line: u32, column: u32 },

    #[error("Cannot parse max chars '{digits}' at column {column}")]
    InvalidMaxChars { digits: String, column: u32 },

    #[error("Template too large: {size} bytes (max {MAX_TEMPLATE_SIZE})")]
    TemplateTooLarge { size: usize },

    #[error("Too many expressions: {count} (max {MAX_EXPRESSION_COUNT})")]
    TooManyExpressions { count: usize },
}

impl ScanError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            ScanError::IllegalCharacter { .. } => codes::scan::ILLEGAL_CHARACTER,
            ScanError::UnterminatedToken => codes::scan::UNTERMINATED_EXPRESSION,
            ScanError::UnexpectedClosingBrace { .. } => codes::scan::UNEXPECTED_CLOSING_BRACE,
            ScanError::InvalidMaxChars { .. } => codes::scan::INVALID_MAX_CHARS,
            ScanError::TemplateTooLarge { .. } => codes::scan::TEMPLATE_TOO_LARGE,
            ScanError::TooManyExpressions { .. } => codes::scan::TOO_MANY_EXPRESSIONS,
        }
    }

    /// Line and column of the offending character, where one exists
    pub fn location(&self) -> Option<(u32, u32)> {
        match self {
            ScanError::IllegalCharacter { line, column, .. }
            | ScanError::UnexpectedClosingBrace { line, column } => Some((*line, *column)),
            _ => None,
        }
    }

    fn illegal(character: char, pos: Position) -> Self {
        ScanError::IllegalCharacter {
            character,
            line: pos.line,
            column: pos.column,
        }
    }
}

/// Characters that may not appear as plain varspec name text
pub fn is_illegal_name_char(ch: char) -> bool {
    matches!(
        ch,
        '+' | '#' | '/' | ';' | '?' | '&' | ' ' | '!' | '=' | '$' | '|' | '*' | ':' | '~' | '-'
            | '{'
    )
}

/// Scan metrics collected while walking one template
#[derive(Debug, Default, Clone)]
pub struct ScanMetrics {
    pub literal_chars: usize,
    pub expressions: usize,
    pub varspecs: usize,
    pub exploded_varspecs: usize,
    pub prefixed_varspecs: usize,
    pub empty_varspecs: usize,

    // Runtime preference-controlled metrics
    pub operator_usage: HashMap<Operator, usize>,
}

impl ScanMetrics {
    pub(crate) fn record_expression(
        &mut self,
        expression: &Expression,
        preferences: &ScannerPreferences,
    ) {
        self.expressions += 1;
        self.varspecs += expression.varspecs.len();

        for varspec in &expression.varspecs {
            if varspec.explode {
                self.exploded_varspecs += 1;
            }
            if varspec.max_chars.is_some() {
                self.prefixed_varspecs += 1;
            }
            if varspec.is_empty() {
                self.empty_varspecs += 1;
            }
        }

        if preferences.track_operator_usage {
            *self.operator_usage.entry(expression.operator).or_insert(0) += 1;
        }
    }
}

// ============================================================================
// STATE MACHINE
// ============================================================================

/// Expression under construction
#[derive(Debug)]
struct ExpressionBuilder {
    operator: Operator,
    varspecs: Vec<VarSpec>,
    start: Position,
}

impl ExpressionBuilder {
    fn new(start: Position) -> Self {
        Self {
            operator: Operator::NoOp,
            varspecs: Vec::new(),
            start,
        }
    }

    /// Close the current varspec at the `,` or `}` found at `end`
    fn close_varspec(&mut self, varspec: VarSpecBuilder, end: Position) -> Result<(), ScanError> {
        let max_chars = if varspec.digits.is_empty() {
            None
        } else {
            Some(
                varspec
                    .digits
                    .parse::<usize>()
                    .map_err(|_| ScanError::InvalidMaxChars {
                        digits: varspec.digits.clone(),
                        column: end.column,
                    })?,
            )
        };

        self.varspecs.push(VarSpec {
            name: varspec.name,
            explode: varspec.explode,
            max_chars,
            span: Span::new(varspec.start, end),
        });
        Ok(())
    }

    fn finish(self, closing_brace: Position) -> Expression {
        Expression {
            operator: self.operator,
            varspecs: self.varspecs,
            span: Span::new(self.start, closing_brace.advance('}')),
        }
    }
}

/// Varspec under construction
#[derive(Debug)]
struct VarSpecBuilder {
    name: String,
    explode: bool,
    digits: String,
    start: Position,
}

impl VarSpecBuilder {
    fn new(start: Position) -> Self {
        Self {
            name: String::new(),
            explode: false,
            digits: String::new(),
            start,
        }
    }
}

#[derive(Debug)]
enum ScanState {
    /// Outside any expression
    Literal,
    /// Just after `{`; the next character may select the operator
    ModifierSlot(ExpressionBuilder),
    /// Reading a varspec name
    InToken(ExpressionBuilder, VarSpecBuilder),
    /// Reading the digits of a `:N` prefix modifier
    MaxCharDigits(ExpressionBuilder, VarSpecBuilder),
}

/// Template scanner with runtime preferences
pub struct TemplateScanner {
    metrics: ScanMetrics,
    preferences: ScannerPreferences,
    parts: Vec<TemplatePart>,
    literal: String,
}

impl Default for TemplateScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateScanner {
    pub fn new() -> Self {
        Self::with_preferences(ScannerPreferences::default())
    }

    pub fn with_preferences(preferences: ScannerPreferences) -> Self {
        Self {
            metrics: ScanMetrics::default(),
            preferences,
            parts: Vec::new(),
            literal: String::new(),
        }
    }

    /// Scan a template into literal and expression parts
    pub fn scan(&mut self, template: &str) -> Result<ParsedTemplate, ScanError> {
        self.metrics = ScanMetrics::default();
        self.parts = Vec::new();
        self.literal = String::new();

        log_debug!("Starting template scan",
            "template_bytes" => template.len(),
            "max_template_size" => MAX_TEMPLATE_SIZE
        );

        if template.len() > MAX_TEMPLATE_SIZE {
            let error = ScanError::TemplateTooLarge {
                size: template.len(),
            };
            log_error!(error.error_code(), "Template size limit exceeded",
                "size" => template.len(),
                "limit" => MAX_TEMPLATE_SIZE
            );
            return Err(error);
        }

        let mut state = ScanState::Literal;
        let mut pos = Position::start();

        for ch in template.chars() {
            state = match self.step(state, ch, pos) {
                Ok(next) => next,
                Err(error) => {
                    log_error!(error.error_code(), "Template scan failed",
                        span = Span::new(pos, pos.advance(ch)),
                        "character" => ch,
                        "line" => pos.line,
                        "column" => pos.column,
                        "expressions_scanned" => self.metrics.expressions
                    );
                    return Err(error);
                }
            };
            pos = pos.advance(ch);
        }

        if !matches!(state, ScanState::Literal) {
            let error = ScanError::UnterminatedToken;
            log_error!(error.error_code(), "Template ended inside an expression",
                "template_bytes" => template.len()
            );
            return Err(error);
        }

        self.flush_literal();
        let parsed = ParsedTemplate::new(std::mem::take(&mut self.parts));

        log_success!(codes::scan::TEMPLATE_SCANNED,
            "Template scanned successfully",
            "expressions" => self.metrics.expressions,
            "varspecs" => self.metrics.varspecs,
            "literal_chars" => self.metrics.literal_chars,
            "exploded" => self.metrics.exploded_varspecs,
            "prefixed" => self.metrics.prefixed_varspecs
        );

        Ok(parsed)
    }

    /// Get metrics from the most recent scan
    pub fn metrics(&self) -> &ScanMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &ScannerPreferences {
        &self.preferences
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    fn step(&mut self, state: ScanState, ch: char, pos: Position) -> Result<ScanState, ScanError> {
        match state {
            ScanState::Literal => match ch {
                '{' => {
                    self.flush_literal();
                    Ok(ScanState::ModifierSlot(ExpressionBuilder::new(pos)))
                }
                '}' => Err(ScanError::UnexpectedClosingBrace {
                    line: pos.line,
                    column: pos.column,
                }),
                _ => {
                    self.literal.push(ch);
                    self.metrics.literal_chars += 1;
                    Ok(ScanState::Literal)
                }
            },

            ScanState::ModifierSlot(mut expression) => match ch {
                '}' => {
                    expression.close_varspec(VarSpecBuilder::new(pos), pos)?;
                    self.finish_expression(expression, pos)
                }
                ',' => {
                    expression.close_varspec(VarSpecBuilder::new(pos), pos)?;
                    Ok(ScanState::InToken(
                        expression,
                        VarSpecBuilder::new(pos.advance(ch)),
                    ))
                }
                _ => match Operator::from_char(ch) {
                    Some(operator) => {
                        expression.operator = operator;
                        Ok(ScanState::InToken(
                            expression,
                            VarSpecBuilder::new(pos.advance(ch)),
                        ))
                    }
                    None if is_illegal_name_char(ch) => Err(ScanError::illegal(ch, pos)),
                    None => {
                        let mut varspec = VarSpecBuilder::new(pos);
                        varspec.name.push(ch);
                        Ok(ScanState::InToken(expression, varspec))
                    }
                },
            },

            ScanState::InToken(mut expression, mut varspec) => match ch {
                '}' => {
                    expression.close_varspec(varspec, pos)?;
                    self.finish_expression(expression, pos)
                }
                ',' => {
                    expression.close_varspec(varspec, pos)?;
                    Ok(ScanState::InToken(
                        expression,
                        VarSpecBuilder::new(pos.advance(ch)),
                    ))
                }
                ':' => Ok(ScanState::MaxCharDigits(expression, varspec)),
                '*' => {
                    varspec.explode = true;
                    Ok(ScanState::InToken(expression, varspec))
                }
                _ if is_illegal_name_char(ch) => Err(ScanError::illegal(ch, pos)),
                _ => {
                    varspec.name.push(ch);
                    Ok(ScanState::InToken(expression, varspec))
                }
            },

            ScanState::MaxCharDigits(mut expression, mut varspec) => match ch {
                '}' => {
                    expression.close_varspec(varspec, pos)?;
                    self.finish_expression(expression, pos)
                }
                ',' => {
                    expression.close_varspec(varspec, pos)?;
                    Ok(ScanState::InToken(
                        expression,
                        VarSpecBuilder::new(pos.advance(ch)),
                    ))
                }
                '0'..='9' => {
                    varspec.digits.push(ch);
                    Ok(ScanState::MaxCharDigits(expression, varspec))
                }
                _ => Err(ScanError::illegal(ch, pos)),
            },
        }
    }

    fn finish_expression(
        &mut self,
        builder: ExpressionBuilder,
        closing_brace: Position,
    ) -> Result<ScanState, ScanError> {
        let expression = builder.finish(closing_brace);
        self.metrics.record_expression(&expression, &self.preferences);

        if self.metrics.expressions > MAX_EXPRESSION_COUNT {
            return Err(ScanError::TooManyExpressions {
                count: self.metrics.expressions,
            });
        }

        if self.preferences.log_expression_details {
            log_debug!("Expression scanned",
                "expression" => &expression,
                "operator" => expression.operator,
                "span" => expression.span
            );
        }

        self.parts.push(TemplatePart::Expression(expression));
        Ok(ScanState::Literal)
    }

    fn flush_literal(&mut self) {
        if !self.literal.is_empty() {
            self.parts
                .push(TemplatePart::Literal(std::mem::take(&mut self.literal)));
        }
    }
}
