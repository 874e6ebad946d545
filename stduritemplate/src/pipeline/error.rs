use crate::expansion::ExpansionError;
use crate::lexical::ScanError;
use crate::substitution::ValueError;
use crate::utils::caret_diagnostic;

/// Errors from any stage of template expansion
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UriTemplateError {
    #[error("Template scan failed: {0}")]
    Scan(#[from] ScanError),

    #[error("Expansion failed: {0}")]
    Expansion(#[from] ExpansionError),

    #[error("Invalid substitutions: {0}")]
    Substitution(#[from] ValueError),
}

impl UriTemplateError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            UriTemplateError::Scan(error) => error.error_code(),
            UriTemplateError::Expansion(error) => error.error_code(),
            UriTemplateError::Substitution(error) => error.error_code(),
        }
    }

    /// Column of the offending template character, where one is known
    pub fn column(&self) -> Option<u32> {
        match self {
            UriTemplateError::Scan(ScanError::InvalidMaxChars { column, .. }) => Some(*column),
            UriTemplateError::Scan(error) => error.location().map(|(_, column)| column),
            UriTemplateError::Expansion(error) => error.column(),
            UriTemplateError::Substitution(_) => None,
        }
    }

    /// The message with a caret excerpt of `template` when the error has a location
    pub fn render(&self, template: &str) -> String {
        let location = match self {
            UriTemplateError::Scan(error) if error.location().is_some() => error.location(),
            _ if !template.contains('\n') => self.column().map(|column| (1, column)),
            _ => None,
        };

        match location {
            Some((line, column)) => caret_diagnostic(template, line, column, &self.to_string()),
            None => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_codes_and_columns_pass_through() {
        let error = UriTemplateError::from(ScanError::UnexpectedClosingBrace { line: 1, column: 4 });
        assert_eq!(error.error_code(), codes::scan::UNEXPECTED_CLOSING_BRACE);
        assert_eq!(error.column(), Some(4));

        let error = UriTemplateError::from(ExpansionError::EmptyToken { column: 2 });
        assert_eq!(error.error_code(), codes::expansion::EMPTY_TOKEN);
        assert_eq!(error.column(), Some(2));

        let error = UriTemplateError::from(ValueError::NotAnObject {
            found: "array".to_string(),
        });
        assert_eq!(error.error_code(), codes::substitution::NOT_AN_OBJECT);
        assert_eq!(error.column(), None);
    }

    #[test]
    fn test_render_points_at_column() {
        let error = UriTemplateError::from(ScanError::IllegalCharacter {
            character: '!',
            line: 1,
            column: 5,
        });
        let rendered = error.render("{var!}");
        assert!(rendered.starts_with("Error: Template scan failed"));
        assert!(rendered.contains("1 | {var!}"));
        assert!(rendered.ends_with("|     ^\n"));

        let error = UriTemplateError::from(ValueError::NotAnObject {
            found: "array".to_string(),
        });
        assert_eq!(error.render("{x}"), error.to_string());
    }

    #[test]
    fn test_display_keeps_stage() {
        let error = UriTemplateError::from(ScanError::UnterminatedToken);
        assert!(error.to_string().starts_with("Template scan failed"));
    }
}
