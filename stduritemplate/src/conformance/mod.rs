//! # Conformance
//!
//! Loads uritemplate-test style suite files and checks the expansion engine against
//! them. Expected values are a string, a list of acceptable strings, or `false` when
//! expansion must fail.

pub mod error;
pub mod runner;
pub mod suite;

pub use error::ConformanceError;
pub use runner::{
    check_case, run_group, run_suite, run_suite_file, run_suites, CaseFailure,
    ConformanceResults, RunnerConfig,
};
pub use suite::{load_suite, Expected, Suite, SuiteGroup, TestCase};
