use super::error::UriTemplateError;
use crate::expansion::ExpansionEngine;
use crate::lexical::TemplateScanner;
use crate::substitution::Substitutions;
use crate::tokens::{ParsedTemplate, TemplatePart};
use std::fmt;
use std::str::FromStr;

/// A template scanned once and expandable many times.
///
/// ```
/// use stduritemplate::{Substitutions, UriTemplate};
///
/// let template = UriTemplate::parse("/users{/id}{?fields*}").unwrap();
/// let vars = Substitutions::new()
///     .with("id", "42")
///     .with("fields", vec!["name", "email"]);
///
/// assert_eq!(template.expand(&vars).unwrap(), "/users/42?fields=name&fields=email");
/// assert_eq!(template.variable_names(), vec!["id", "fields"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriTemplate {
    source: String,
    parsed: ParsedTemplate,
}

impl UriTemplate {
    pub fn parse(source: &str) -> Result<Self, UriTemplateError> {
        let parsed = TemplateScanner::new().scan(source)?;
        Ok(Self {
            source: source.to_string(),
            parsed,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn parts(&self) -> &[TemplatePart] {
        self.parsed.parts()
    }

    pub fn parsed(&self) -> &ParsedTemplate {
        &self.parsed
    }

    pub fn expand(&self, substitutions: &Substitutions) -> Result<String, UriTemplateError> {
        Ok(ExpansionEngine::new(substitutions).expand(&self.parsed)?)
    }

    /// Normalize a JSON object into substitutions, then expand
    pub fn expand_json(&self, data: &serde_json::Value) -> Result<String, UriTemplateError> {
        let substitutions = Substitutions::from_json(data)?;
        self.expand(&substitutions)
    }

    pub fn variable_names(&self) -> Vec<&str> {
        self.parsed.variable_names()
    }

    pub fn expression_count(&self) -> usize {
        self.parsed.expression_count()
    }
}

impl FromStr for UriTemplate {
    type Err = UriTemplateError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        Self::parse(source)
    }
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
