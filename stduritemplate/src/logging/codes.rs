//! Log codes
//!
//! Every error enum in the crate maps itself onto one of these through `error_code()`,
//! and every success event names the step it completed. A code carries its stage and a
//! one-line summary, so no lookup table is needed when an event is rendered.
//!
//! `E`/`ERR` codes report failures, `I` codes completed work.

use std::fmt;

/// Part of the crate a code is raised from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    System,
    Input,
    Scan,
    Substitution,
    Expansion,
    Conformance,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::System => "system",
            Stage::Input => "input",
            Stage::Scan => "scan",
            Stage::Substitution => "substitution",
            Stage::Expansion => "expansion",
            Stage::Conformance => "conformance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code {
    id: &'static str,
    stage: Stage,
    summary: &'static str,
}

impl Code {
    pub const fn new(id: &'static str, stage: Stage, summary: &'static str) -> Self {
        Self { id, stage, summary }
    }

    pub fn as_str(&self) -> &'static str {
        self.id
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn summary(&self) -> &'static str {
        self.summary
    }

    pub fn is_success(&self) -> bool {
        self.id.starts_with('I')
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.id)
    }
}

/// Declares the codes of one stage plus an `ALL` slice listing them
macro_rules! stage_codes {
    ($stage:ident: $($name:ident = $id:literal, $summary:literal;)+) => {
        use super::{Code, Stage};

        $(pub const $name: Code = Code::new($id, Stage::$stage, $summary);)+

        pub const ALL: &[Code] = &[$($name),+];
    };
}

pub mod system {
    stage_codes!(System:
        INTERNAL_ERROR = "ERR001", "Internal error; report the template and data";
        INITIALIZATION_FAILURE = "ERR002", "Logging setup failed; check STDURITEMPLATE_* variables";
        LOGGING_INITIALIZED = "I001", "Logging initialized";
    );
}

/// Template and data files read by the command line
pub mod input {
    stage_codes!(Input:
        FILE_NOT_FOUND = "E001", "Input file not found";
        IO_ERROR = "E002", "Input file could not be read";
        INVALID_JSON = "E003", "Data file is not valid JSON";
    );
}

pub mod scan {
    stage_codes!(Scan:
        ILLEGAL_CHARACTER = "E020", "Character not allowed inside an expression";
        UNTERMINATED_EXPRESSION = "E021", "Expression opened with '{' is never closed";
        UNEXPECTED_CLOSING_BRACE = "E022", "'}' without a matching '{'";
        INVALID_MAX_CHARS = "E023", "Prefix length after ':' is not a valid integer";
        TEMPLATE_TOO_LARGE = "E024", "Template exceeds the build's size limit";
        TOO_MANY_EXPRESSIONS = "E025", "Template exceeds the build's expression limit";
        TEMPLATE_SCANNED = "I010", "Template scanned";
    );
}

pub mod substitution {
    stage_codes!(Substitution:
        UNSUPPORTED_VALUE_TYPE = "E040", "Value is not a scalar, a list of scalars or a map of scalars";
        NOT_AN_OBJECT = "E041", "Substitutions are not a JSON object";
        SUBSTITUTIONS_LOADED = "I012", "Substitution values loaded";
    );
}

pub mod expansion {
    stage_codes!(Expansion:
        EMPTY_TOKEN = "E060", "Expression holds an empty variable name";
        MAP_TRIMMING_UNSUPPORTED = "E061", "':N' applied to a map value";
        OUTPUT_TOO_LARGE = "E062", "Expanded text exceeds the build's output limit";
        TEMPLATE_EXPANDED = "I011", "Template expanded";
    );
}

pub mod conformance {
    stage_codes!(Conformance:
        SUITE_READ_ERROR = "E080", "Suite file could not be read";
        SUITE_PARSE_ERROR = "E081", "Suite file is malformed";
        SUITE_TOO_LARGE = "E082", "Suite file exceeds the size limit";
        CASE_MISMATCH = "E083", "Case result differs from its expectation";
        SUITE_PASSED = "I020", "Every case of the suite passed";
        RUN_COMPLETED = "I021", "Conformance run completed";
    );
}

/// Every code, grouped by stage
pub fn all() -> impl Iterator<Item = Code> {
    [
        system::ALL,
        input::ALL,
        scan::ALL,
        substitution::ALL,
        expansion::ALL,
        conformance::ALL,
    ]
    .into_iter()
    .flatten()
    .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let mut seen = HashSet::new();
        for code in all() {
            assert!(seen.insert(code.as_str()), "duplicate code {}", code);
        }
        assert_eq!(seen.len(), 26);
    }

    #[test]
    fn test_prefix_matches_kind() {
        for code in all() {
            assert_eq!(code.is_success(), code.as_str().starts_with('I'));
            assert!(!code.summary().is_empty());
        }
        assert!(scan::TEMPLATE_SCANNED.is_success());
        assert!(!scan::ILLEGAL_CHARACTER.is_success());
    }

    #[test]
    fn test_stage_follows_module() {
        assert!(scan::ALL.iter().all(|code| code.stage() == Stage::Scan));
        assert!(input::ALL.iter().all(|code| code.stage() == Stage::Input));
        assert_eq!(conformance::CASE_MISMATCH.stage().as_str(), "conformance");
        assert_eq!(expansion::EMPTY_TOKEN.to_string(), "E060");
    }
}
