//! Shared primitives used by the scanner, expansion engine and diagnostics.

pub mod span;

pub use span::{caret_diagnostic, Position, Span};
