use super::operator::Operator;
use crate::utils::Span;
use std::fmt;

/// One variable reference inside an expression: `name`, `name*` or `name:N`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarSpec {
    pub name: String,
    pub explode: bool,
    /// Prefix length in Unicode scalar values; `None` is unlimited
    pub max_chars: Option<usize>,
    /// From the first name character up to the terminating `,` or `}` (exclusive)
    pub span: Span,
}

impl VarSpec {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }

    /// Column of the character that closed this varspec
    pub fn end_column(&self) -> u32 {
        self.span.end.column
    }
}

impl fmt::Display for VarSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.explode {
            f.write_str("*")?;
        }
        if let Some(max) = self.max_chars {
            write!(f, ":{}", max)?;
        }
        Ok(())
    }
}

/// A `{...}` expression: one operator shared by one or more varspecs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub operator: Operator,
    pub varspecs: Vec<VarSpec>,
    /// From `{` through `}` inclusive
    pub span: Span,
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        if let Some(ch) = self.operator.as_char() {
            write!(f, "{}", ch)?;
        }
        for (i, varspec) in self.varspecs.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", varspec)?;
        }
        f.write_str("}")
    }
}
