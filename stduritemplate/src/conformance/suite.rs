//! Test suite files in the uritemplate-test layout
//!
//! ```json
//! { "Level 1 Examples": {
//!     "level": 1,
//!     "variables": { "var": "value" },
//!     "testcases": [ ["{var}", "value"], ["{}", false] ] } }
//! ```

use super::error::ConformanceError;
use crate::config::compile_time::conformance::MAX_SUITE_FILE_SIZE;
use crate::log_error;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// What a case must produce
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Expected {
    Exact(String),
    /// Any one of these is accepted (map ordering differs between implementations)
    AnyOf(Vec<String>),
    /// Only `false` appears in suites: expansion must fail
    Failure(bool),
}

impl Expected {
    pub fn expects_failure(&self) -> bool {
        matches!(self, Expected::Failure(_))
    }

    pub fn accepts(&self, output: &str) -> bool {
        match self {
            Expected::Exact(expected) => expected == output,
            Expected::AnyOf(options) => options.iter().any(|option| option == output),
            Expected::Failure(_) => false,
        }
    }
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Exact(expected) => write!(f, "{:?}", expected),
            Expected::AnyOf(options) => write!(f, "one of {:?}", options),
            Expected::Failure(_) => f.write_str("an error"),
        }
    }
}

/// One `[template, expected]` pair
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TestCase(pub String, pub Expected);

impl TestCase {
    pub fn template(&self) -> &str {
        &self.0
    }

    pub fn expected(&self) -> &Expected {
        &self.1
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuiteGroup {
    #[serde(default)]
    pub level: Option<u8>,
    #[serde(default = "empty_object")]
    pub variables: serde_json::Value,
    pub testcases: Vec<TestCase>,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// A loaded suite file; groups run in name order
#[derive(Debug, Clone)]
pub struct Suite {
    pub path: PathBuf,
    pub groups: BTreeMap<String, SuiteGroup>,
}

impl Suite {
    pub fn case_count(&self) -> usize {
        self.groups.values().map(|group| group.testcases.len()).sum()
    }

    /// Parse suite text; `path` is only used for diagnostics
    pub fn parse(path: &Path, content: &str) -> Result<Self, ConformanceError> {
        let groups: BTreeMap<String, SuiteGroup> =
            serde_json::from_str(content).map_err(|e| ConformanceError::Parse {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        for (name, group) in &groups {
            if let Some(case) = group
                .testcases
                .iter()
                .find(|case| case.expected() == &Expected::Failure(true))
            {
                return Err(ConformanceError::Parse {
                    path: path.display().to_string(),
                    message: format!(
                        "group '{}' expects `true` for '{}'; only `false` is allowed",
                        name,
                        case.template()
                    ),
                });
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            groups,
        })
    }
}

/// Read and parse a suite file within the size limit
pub fn load_suite(path: &Path) -> Result<Suite, ConformanceError> {
    let display = path.display().to_string();

    let metadata = fs::metadata(path).map_err(|e| ConformanceError::Io {
        path: display.clone(),
        error: e.to_string(),
    })?;

    if metadata.len() > MAX_SUITE_FILE_SIZE {
        let error = ConformanceError::SuiteTooLarge {
            path: display.clone(),
            size: metadata.len(),
        };
        log_error!(error.error_code(), "Suite file exceeds size limit",
            "file" => &display,
            "size" => metadata.len(),
            "limit" => MAX_SUITE_FILE_SIZE
        );
        return Err(error);
    }

    let content = fs::read_to_string(path).map_err(|e| ConformanceError::Io {
        path: display.clone(),
        error: e.to_string(),
    })?;

    Suite::parse(path, &content).map_err(|error| {
        log_error!(error.error_code(), "Suite file is malformed",
            "file" => &display,
            "error" => &error
        );
        error
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"{
        "Level 1 Examples": {
            "level": 1,
            "variables": {"var": "value", "hello": "Hello World!"},
            "testcases": [
                ["{var}", "value"],
                ["{hello}", "Hello%20World%21"]
            ]
        },
        "Map order": {
            "variables": {"keys": {"a": "1", "b": "2"}},
            "testcases": [
                ["{keys}", ["a,1,b,2", "b,2,a,1"]],
                ["{keys:1}", false]
            ]
        }
    }"#;

    #[test]
    fn test_parse_expected_shapes() {
        let suite = Suite::parse(Path::new("sample.json"), SAMPLE).unwrap();
        assert_eq!(suite.groups.len(), 2);
        assert_eq!(suite.case_count(), 4);

        let level1 = &suite.groups["Level 1 Examples"];
        assert_eq!(level1.level, Some(1));
        assert_eq!(level1.testcases[0].expected(), &Expected::Exact("value".to_string()));

        let map_order = &suite.groups["Map order"];
        assert_eq!(map_order.level, None);
        assert!(map_order.testcases[0].expected().accepts("b,2,a,1"));
        assert!(map_order.testcases[1].expected().expects_failure());
    }

    #[test]
    fn test_missing_variables_default_to_empty() {
        let suite = Suite::parse(
            Path::new("inline.json"),
            r#"{"g": {"testcases": [["x", "x"]]}}"#,
        )
        .unwrap();
        assert_eq!(suite.groups["g"].variables, serde_json::json!({}));
    }

    #[test]
    fn test_true_expectation_is_rejected() {
        assert_matches!(
            Suite::parse(Path::new("bad.json"), r#"{"g": {"testcases": [["{x}", true]]}}"#),
            Err(ConformanceError::Parse { message, .. }) if message.contains("'{x}'")
        );
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let suite = load_suite(file.path()).unwrap();
        assert_eq!(suite.path, file.path());
        assert_eq!(suite.case_count(), 4);
    }

    #[test]
    fn test_load_errors() {
        assert_matches!(
            load_suite(Path::new("/nonexistent/suite.json")),
            Err(ConformanceError::Io { .. })
        );

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[1, 2").unwrap();
        assert_matches!(load_suite(file.path()), Err(ConformanceError::Parse { .. }));
    }
}
