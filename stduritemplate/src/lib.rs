//! RFC 6570 URI Template expansion.
//!
//! ```
//! use stduritemplate::{expand, Substitutions};
//!
//! let vars = Substitutions::new()
//!     .with("baseurl", "https://example.com")
//!     .with("statuses", vec!["active", "pending"]);
//!
//! assert_eq!(
//!     expand("{+baseurl}/users{?statuses}", &vars).unwrap(),
//!     "https://example.com/users?statuses=active,pending"
//! );
//! ```

// Internal modules
pub mod config;
pub mod conformance;
pub mod expansion;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod substitution;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use expansion::ExpansionError;
pub use lexical::ScanError;
pub use pipeline::{expand, expand_json, UriTemplate, UriTemplateError};
pub use substitution::{Substitutions, Value, ValueError};
