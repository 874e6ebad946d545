//! # Expansion
//!
//! Resolves scanned expressions against a substitution bag and produces the expanded
//! URI text.
//!
//! ## Key Components
//!
//! - **[`ExpansionEngine`]** - walks template parts, places operator prefixes and
//!   separators, and skips absent or empty values
//! - **`serializer`** - string, list and map rules per operator
//! - **`encoder`** - truncation and percent-encoding with optional reserved passthrough
//! - **[`ExpansionError`]** - empty tokens, map trimming and the output size limit

pub mod encoder;
pub mod engine;
pub mod error;
pub mod serializer;

pub use encoder::{encode, truncate};
pub use engine::{expand, ExpansionEngine, ExpansionMetrics};
pub use error::ExpansionError;
