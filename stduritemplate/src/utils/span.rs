//! Template locations
//!
//! Lines and columns are 1-based and columns count chars; offsets count bytes so a span
//! can slice the template it came from.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// The position just past `ch`
    pub fn advance(self, ch: char) -> Self {
        if ch == '\n' {
            Self {
                offset: self.offset + 1,
                line: self.line + 1,
                column: 1,
            }
        } else {
            Self {
                offset: self.offset + ch.len_utf8(),
                column: self.column + 1,
                ..self
            }
        }
    }

    pub fn advance_str(self, text: &str) -> Self {
        text.chars().fold(self, Self::advance)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Half-open range of template text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(start.offset <= end.offset, "span ends before it starts");
        Self { start, end }
    }

    pub fn slice<'a>(&self, template: &'a str) -> &'a str {
        &template[self.start.offset..self.end.offset]
    }
}

/// `1:7-12` on one line, `1:7-2:3` across lines
impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(f, "{}-{}", self.start, self.end.column)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// `message` followed by the template line at `line` with a caret under `column`.
/// Without such a line only the message and location are written.
pub fn caret_diagnostic(template: &str, line: u32, column: u32, message: &str) -> String {
    let mut out = format!("Error: {}\n  --> {}:{}\n", message, line, column);

    let text = line
        .checked_sub(1)
        .and_then(|index| template.split('\n').nth(index as usize));

    if let Some(text) = text {
        let gutter = line.to_string();
        let blank = " ".repeat(gutter.len());
        let indent = " ".repeat(column.saturating_sub(1) as usize);

        out.push_str(&format!("   {} |\n", blank));
        out.push_str(&format!("{} | {}\n", gutter, text.trim_end_matches('\r')));
        out.push_str(&format!("   {} | {}^\n", blank, indent));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_counts_chars_and_bytes() {
        let pos = Position::start().advance('a').advance('é');
        assert_eq!((pos.offset, pos.column), (3, 3));

        let next_line = pos.advance('\n');
        assert_eq!((next_line.line, next_line.column), (2, 1));
    }

    #[test]
    fn test_span_slice_and_display() {
        let template = "/users{?id}";
        let start = Position::start().advance_str("/users");
        let span = Span::new(start, start.advance_str("{?id}"));

        assert_eq!(span.slice(template), "{?id}");
        assert_eq!(span.to_string(), "1:7-12");

        let across = Span::new(start, start.advance_str("{\n"));
        assert_eq!(across.to_string(), "1:7-2:1");
    }

    #[test]
    fn test_caret_diagnostic() {
        let rendered = caret_diagnostic("{a!b}", 1, 3, "Illegal character '!'");
        assert!(rendered.starts_with("Error: Illegal character '!'\n  --> 1:3\n"));
        assert!(rendered.contains("1 | {a!b}"));
        assert!(rendered.ends_with("|   ^\n"));

        let second_line = caret_diagnostic("a\n{x!}", 2, 3, "bad");
        assert!(second_line.contains("2 | {x!}"));

        let missing = caret_diagnostic("{x}", 4, 1, "bad");
        assert_eq!(missing, "Error: bad\n  --> 4:1\n");
    }
}
