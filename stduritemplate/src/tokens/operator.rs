//! Expression operators and their serialization conventions

use std::fmt;

/// The operator selected by the first character of an expression.
///
/// `NoOp` is simple string expansion (`{var}`); the rest map one-to-one onto the
/// operator characters `+ # . / ; ? &`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    NoOp,
    Plus,
    Hash,
    Dot,
    Slash,
    Semicolon,
    QuestionMark,
    Amp,
}

impl Operator {
    /// Classify the first character of an expression. `None` means the character is
    /// not an operator and belongs to the variable name.
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '+' => Some(Operator::Plus),
            '#' => Some(Operator::Hash),
            '.' => Some(Operator::Dot),
            '/' => Some(Operator::Slash),
            ';' => Some(Operator::Semicolon),
            '?' => Some(Operator::QuestionMark),
            '&' => Some(Operator::Amp),
            _ => None,
        }
    }

    /// Operator character as written in a template
    pub fn as_char(&self) -> Option<char> {
        match self {
            Operator::NoOp => None,
            Operator::Plus => Some('+'),
            Operator::Hash => Some('#'),
            Operator::Dot => Some('.'),
            Operator::Slash => Some('/'),
            Operator::Semicolon => Some(';'),
            Operator::QuestionMark => Some('?'),
            Operator::Amp => Some('&'),
        }
    }

    /// Emitted before the first varspec that produces output
    pub fn prefix(&self) -> Option<char> {
        match self {
            Operator::NoOp | Operator::Plus => None,
            Operator::Hash => Some('#'),
            Operator::Dot => Some('.'),
            Operator::Slash => Some('/'),
            Operator::Semicolon => Some(';'),
            Operator::QuestionMark => Some('?'),
            Operator::Amp => Some('&'),
        }
    }

    /// Emitted between varspecs, and between exploded list items or map pairs
    pub fn separator(&self) -> char {
        match self {
            Operator::Dot => '.',
            Operator::Slash => '/',
            Operator::Semicolon => ';',
            Operator::QuestionMark | Operator::Amp => '&',
            Operator::NoOp | Operator::Plus | Operator::Hash => ',',
        }
    }

    /// Whether reserved characters and `%XX` triplets pass through unencoded
    pub fn allows_reserved(&self) -> bool {
        matches!(self, Operator::Plus | Operator::Hash)
    }

    /// Whether string values are written as `name=value`
    pub fn is_named(&self) -> bool {
        matches!(
            self,
            Operator::Semicolon | Operator::QuestionMark | Operator::Amp
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operator::NoOp => "simple",
            Operator::Plus => "reserved",
            Operator::Hash => "fragment",
            Operator::Dot => "label",
            Operator::Slash => "path",
            Operator::Semicolon => "path-parameter",
            Operator::QuestionMark => "query",
            Operator::Amp => "query-continuation",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
