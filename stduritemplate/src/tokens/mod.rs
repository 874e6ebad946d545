//! Parsed template representation
//!
//! The scanner turns template text into a sequence of [`TemplatePart`]s: literal runs
//! copied verbatim into the output, and [`Expression`]s that the expansion engine
//! resolves against a substitution bag.
//!
//! ## Key Components
//!
//! - **[`Operator`]** - the eight RFC 6570 expression operators with their prefix,
//!   separator and reserved-passthrough conventions
//! - **[`VarSpec`]** - a variable name with optional explode (`*`) and prefix (`:N`)
//!   modifiers
//! - **[`Expression`]** - an operator and its varspecs
//! - **[`ParsedTemplate`]** - the ordered parts of one template

pub mod expression;
pub mod operator;

pub use expression::{Expression, VarSpec};
pub use operator::Operator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePart {
    Literal(String),
    Expression(Expression),
}

/// Scanner output: literal and expression parts in template order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTemplate {
    parts: Vec<TemplatePart>,
}

impl ParsedTemplate {
    pub fn new(parts: Vec<TemplatePart>) -> Self {
        Self { parts }
    }

    pub fn parts(&self) -> &[TemplatePart] {
        &self.parts
    }

    pub fn expressions(&self) -> impl Iterator<Item = &Expression> {
        self.parts.iter().filter_map(|part| match part {
            TemplatePart::Expression(expression) => Some(expression),
            TemplatePart::Literal(_) => None,
        })
    }

    pub fn expression_count(&self) -> usize {
        self.expressions().count()
    }

    /// Total length of literal text, used to size the output buffer
    pub fn literal_len(&self) -> usize {
        self.parts
            .iter()
            .map(|part| match part {
                TemplatePart::Literal(text) => text.len(),
                TemplatePart::Expression(_) => 0,
            })
            .sum()
    }

    /// Variable names in order of first appearance, without duplicates or empty names
    pub fn variable_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for varspec in self.expressions().flat_map(|e| e.varspecs.iter()) {
            if !varspec.is_empty() && !names.contains(&varspec.name.as_str()) {
                names.push(&varspec.name);
            }
        }
        names
    }

    pub fn is_literal_only(&self) -> bool {
        self.expression_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{Position, Span};

    fn expression(names: &[&str]) -> TemplatePart {
        let start = Position::start();
        TemplatePart::Expression(Expression {
            operator: Operator::NoOp,
            varspecs: names
                .iter()
                .map(|name| VarSpec {
                    name: name.to_string(),
                    explode: false,
                    max_chars: None,
                    span: Span::new(start, start),
                })
                .collect(),
            span: Span::new(start, start),
        })
    }

    #[test]
    fn test_variable_names_are_deduplicated_in_order() {
        let template = ParsedTemplate::new(vec![
            TemplatePart::Literal("/a".to_string()),
            expression(&["x", "y"]),
            TemplatePart::Literal("/b".to_string()),
            expression(&["y", "", "z"]),
        ]);

        assert_eq!(template.variable_names(), vec!["x", "y", "z"]);
        assert_eq!(template.expression_count(), 2);
        assert_eq!(template.literal_len(), 4);
        assert!(!template.is_literal_only());
    }

    #[test]
    fn test_literal_only_template() {
        let template = ParsedTemplate::new(vec![TemplatePart::Literal("plain".to_string())]);
        assert!(template.is_literal_only());
        assert!(template.variable_names().is_empty());
    }
}
