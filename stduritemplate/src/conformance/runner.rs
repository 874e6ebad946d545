//! Conformance runner
//!
//! Runs suite groups sequentially or spread over scoped worker threads. Each group
//! normalizes its variables once, reading `nativedate`/`nativedatetwo` epoch milliseconds
//! as timestamps; a normalization failure fails every case in the group except those
//! that expect an error.

use super::error::ConformanceError;
use super::suite::{load_suite, Expected, Suite, SuiteGroup, TestCase};
use crate::config::compile_time::conformance::MAX_WORKER_THREADS;
use crate::config::runtime::ConformancePreferences;
use crate::logging::{self, codes};
use crate::pipeline::{self, UriTemplateError};
use crate::substitution::{self, Substitutions, ValueError};
use crate::{log_debug, log_error, log_info, log_success, log_warning};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub max_threads: usize,
    pub parallel: bool,
    pub fail_fast: bool,
}

impl RunnerConfig {
    pub fn from_preferences(preferences: &ConformancePreferences) -> Self {
        Self {
            max_threads: thread::available_parallelism()
                .map(|n| n.get().min(MAX_WORKER_THREADS))
                .unwrap_or(4)
                .max(1),
            parallel: preferences.parallel,
            fail_fast: preferences.fail_fast,
        }
    }

    pub fn sequential() -> Self {
        Self {
            max_threads: 1,
            parallel: false,
            fail_fast: false,
        }
    }

    fn worker_count(&self, groups: usize) -> usize {
        if self.parallel {
            self.max_threads.clamp(1, MAX_WORKER_THREADS).min(groups.max(1))
        } else {
            1
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self::from_preferences(&ConformancePreferences::default())
    }
}

// ============================================================================
// RESULTS
// ============================================================================

/// A case whose outcome did not match its expectation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseFailure {
    pub suite: PathBuf,
    pub group: String,
    pub template: String,
    pub expected: Expected,
    /// Expansion output, or the error message
    pub actual: Result<String, String>,
}

impl CaseFailure {
    pub fn reason(&self) -> String {
        match &self.actual {
            Ok(output) => format!("expected {}, got {:?}", self.expected, output),
            Err(error) => format!("expected {}, failed with: {}", self.expected, error),
        }
    }
}

#[derive(Debug, Default)]
pub struct ConformanceResults {
    pub passed: usize,
    pub failures: Vec<CaseFailure>,
    pub suites_run: usize,
    pub groups_run: usize,
    pub duration: Duration,
}

impl ConformanceResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed()
    }

    pub fn all_passed(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn success_rate(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.passed as f64 / self.total() as f64
        }
    }

    pub fn merge(&mut self, other: ConformanceResults) {
        self.passed += other.passed;
        self.failures.extend(other.failures);
        self.suites_run += other.suites_run;
        self.groups_run += other.groups_run;
    }

    pub fn summary(&self) -> String {
        format!(
            "Conformance run completed: {} suites, {} groups, {} cases, {} passed ({:.1}%), {} failed, {:.2}s total",
            self.suites_run,
            self.groups_run,
            self.total(),
            self.passed,
            self.success_rate() * 100.0,
            self.failed(),
            self.duration.as_secs_f64()
        )
    }
}

// ============================================================================
// CASES AND GROUPS
// ============================================================================

/// Run one case; `None` means it passed
pub fn check_case(
    suite: &Path,
    group: &str,
    variables: &Result<Substitutions, ValueError>,
    case: &TestCase,
) -> Option<CaseFailure> {
    let actual = match variables {
        Ok(substitutions) => pipeline::expand(case.template(), substitutions),
        Err(error) => Err(UriTemplateError::from(error.clone())),
    }
    .map_err(|error| error.to_string());

    let passed = match &actual {
        Ok(output) => case.expected().accepts(output),
        Err(_) => case.expected().expects_failure(),
    };

    if passed {
        None
    } else {
        Some(CaseFailure {
            suite: suite.to_path_buf(),
            group: group.to_string(),
            template: case.template().to_string(),
            expected: case.expected().clone(),
            actual,
        })
    }
}

/// Run every case of one group, stopping early once `stop` is raised
pub fn run_group(
    suite: &Path,
    name: &str,
    group: &SuiteGroup,
    fail_fast: bool,
    stop: &AtomicBool,
) -> ConformanceResults {
    logging::with_suite_context(suite.to_path_buf(), name, || {
        let mut results = ConformanceResults::new();
        results.groups_run = 1;

        let variables = substitution::from_json_with_timestamps(&group.variables);

        log_debug!("Running suite group",
            "cases" => group.testcases.len(),
            "level" => group.level.map_or_else(|| "-".to_string(), |l| l.to_string())
        );

        for case in &group.testcases {
            if stop.load(Ordering::Relaxed) {
                break;
            }

            match check_case(suite, name, &variables, case) {
                None => results.passed += 1,
                Some(failure) => {
                    log_error!(codes::conformance::CASE_MISMATCH, "Conformance case failed",
                        "template" => &failure.template,
                        "reason" => failure.reason()
                    );
                    results.failures.push(failure);

                    if fail_fast {
                        stop.store(true, Ordering::Relaxed);
                        break;
                    }
                }
            }
        }

        results
    })
}

// ============================================================================
// SUITES
// ============================================================================

/// Run all groups of a loaded suite
pub fn run_suite(suite: &Suite, config: &RunnerConfig) -> Result<ConformanceResults, ConformanceError> {
    run_suite_with_stop(suite, config, &AtomicBool::new(false))
}

fn run_suite_with_stop(
    suite: &Suite,
    config: &RunnerConfig,
    stop: &AtomicBool,
) -> Result<ConformanceResults, ConformanceError> {
    let groups: Vec<(&String, &SuiteGroup)> = suite.groups.iter().collect();
    let workers = config.worker_count(groups.len());

    log_info!("Running conformance suite",
        "file" => suite.path.display(),
        "groups" => groups.len(),
        "cases" => suite.case_count(),
        "workers" => workers
    );

    let mut results = if workers <= 1 {
        let mut results = ConformanceResults::new();
        for (name, group) in &groups {
            results.merge(run_group(&suite.path, name, group, config.fail_fast, stop));
            if stop.load(Ordering::Relaxed) {
                break;
            }
        }
        results
    } else {
        run_groups_parallel(suite, &groups, workers, config.fail_fast, stop)?
    };

    results.suites_run = 1;

    if results.all_passed() {
        log_success!(codes::conformance::SUITE_PASSED,
            "Conformance suite passed",
            "file" => suite.path.display(),
            "cases" => results.passed
        );
    } else {
        log_warning!("Conformance suite has failing cases",
            "file" => suite.path.display(),
            "passed" => results.passed,
            "failed" => results.failed()
        );
    }

    Ok(results)
}

fn run_groups_parallel(
    suite: &Suite,
    groups: &[(&String, &SuiteGroup)],
    workers: usize,
    fail_fast: bool,
    stop: &AtomicBool,
) -> Result<ConformanceResults, ConformanceError> {
    let per_worker = groups.len().div_ceil(workers);

    thread::scope(|scope| -> Result<ConformanceResults, ConformanceError> {
        let handles: Vec<_> = groups
            .chunks(per_worker)
            .map(|chunk| {
                scope.spawn(move || {
                    let mut results = ConformanceResults::new();
                    for (name, group) in chunk {
                        results.merge(run_group(&suite.path, name, group, fail_fast, stop));
                    }
                    results
                })
            })
            .collect();

        let mut results = ConformanceResults::new();
        for handle in handles {
            let worker_results = handle.join().map_err(|_| ConformanceError::WorkerPanicked {
                path: suite.path.display().to_string(),
            })?;
            results.merge(worker_results);
        }
        Ok(results)
    })
}

/// Load and run one suite file
pub fn run_suite_file(path: &Path, config: &RunnerConfig) -> Result<ConformanceResults, ConformanceError> {
    let suite = load_suite(path)?;
    run_suite(&suite, config)
}

/// Run suite files in order; with `fail_fast` the run stops at the first failing case
pub fn run_suites(paths: &[PathBuf], config: &RunnerConfig) -> Result<ConformanceResults, ConformanceError> {
    let start_time = Instant::now();
    let stop = AtomicBool::new(false);
    let mut results = ConformanceResults::new();

    for path in paths {
        let suite = load_suite(path)?;
        results.merge(run_suite_with_stop(&suite, config, &stop)?);

        if stop.load(Ordering::Relaxed) {
            log_warning!("Fail-fast mode enabled, stopping conformance run",
                "file" => path.display()
            );
            break;
        }
    }

    results.duration = start_time.elapsed();

    crate::log_performance!(codes::conformance::RUN_COMPLETED,
        "Conformance run completed",
        duration = results.duration,
        "suites" => results.suites_run,
        "passed" => results.passed,
        "failed" => results.failed()
    );

    Ok(results)
}
