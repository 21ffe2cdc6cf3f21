//! Test runner implementation (pytest-style)
//!
//! Runs collected tests one after another: each test gets a fresh fixture, the suite's rules are applied to its
//! statement, and the statement's outcome is mapped to a [`TestResult`]. Reporting is delegated to a
//! [`TestReporter`].
//!
//! ## Outcomes
//!
//! - An assumption failure (including a satisfied ignore condition) is a skip, never a failure.
//! - A configuration error raised while applying rules is reported as an error; the body does not run.
//! - A panic in the fixture setup or the test body is caught and reported as a failure.

use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use condignore_core::{ConfigError, Signal, panic_message};

use super::CliResult;
use super::reporter::TestReporter;
use crate::suite::{Suite, TestInfo};

/// Runner configuration
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    pub verbose: bool,
    /// Stop after the first failure or error
    pub stop_on_fail: bool,
    /// Substring a test id must contain to be run
    pub filter: Option<String>,
    /// Require the filter to equal the test id
    pub exact: bool,
    /// Tests whose id matches any of these are not run
    pub skip: Vec<String>,
}

/// Result of running a single test
#[derive(Debug)]
pub enum TestResult {
    Passed(Duration),
    Failed(Duration, String),
    Skipped(String),
    /// The test could not be prepared, e.g. its ignore condition failed to build
    Errored(Duration, ConfigError),
}

impl TestResult {
    pub fn is_failure(&self) -> bool {
        matches!(self, TestResult::Failed(..) | TestResult::Errored(..))
    }
}

/// Summary of test run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errored: usize,
    pub duration: Duration,
}

impl TestSummary {
    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.errored > 0
    }

    fn record(&mut self, result: &TestResult) {
        self.total += 1;
        match result {
            TestResult::Passed(_) => self.passed += 1,
            TestResult::Failed(..) => self.failed += 1,
            TestResult::Skipped(_) => self.skipped += 1,
            TestResult::Errored(..) => self.errored += 1,
        }
    }
}

/// Keep the tests whose id matches the configured filter and none of the skip filters.
///
/// Matching is by substring, or by whole id with `exact`.
pub fn filter_tests(tests: Vec<TestInfo>, config: &RunConfig) -> Vec<TestInfo> {
    let matches = |id: &str, pattern: &str| if config.exact { id == pattern } else { id.contains(pattern) };
    tests
        .into_iter()
        .filter(|t| {
            let id = t.id();
            config.filter.as_deref().is_none_or(|keyword| matches(&id, keyword))
                && !config.skip.iter().any(|pattern| matches(&id, pattern))
        })
        .collect()
}

/// Run every selected test of `suite`, reporting as it goes.
///
/// Returns the run summary; failing tests are not an error here. Only reporter I/O failures are.
#[tracing::instrument(skip_all, fields(verbose = config.verbose, filter = config.filter.as_deref()))]
pub fn run_suite(suite: &Suite, config: &RunConfig, reporter: &mut dyn TestReporter) -> CliResult<TestSummary> {
    let start_time = Instant::now();

    let tests = filter_tests(suite.collect(), config);
    reporter.on_collection_complete(tests.len())?;
    tracing::debug!(count = tests.len(), "collected tests");

    let mut summary = TestSummary::default();

    for test in &tests {
        reporter.on_test_start(test)?;
        let result = run_single_test(suite, test);
        summary.record(&result);
        reporter.on_test_complete(test, &result)?;

        if config.stop_on_fail && result.is_failure() {
            tracing::debug!(test = %test.id(), "stopping after first failure");
            break;
        }
    }

    summary.duration = start_time.elapsed();
    reporter.on_run_complete(&summary)?;

    Ok(summary)
}

/// Run one test and classify its outcome.
pub fn run_single_test(suite: &Suite, test: &TestInfo) -> TestResult {
    let start = Instant::now();

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| suite.execute(test)));
    let duration = start.elapsed();

    match outcome {
        Ok(Ok(Ok(()))) => TestResult::Passed(duration),
        Ok(Ok(Err(Signal::AssumptionFailed(reason)))) => TestResult::Skipped(reason),
        Ok(Ok(Err(Signal::Failed(msg)))) => TestResult::Failed(duration, msg),
        Ok(Err(err)) => {
            tracing::warn!(test = %test.id(), condition = err.condition(), "test configuration error");
            TestResult::Errored(duration, err)
        }
        Err(payload) => {
            let msg = match panic_message(payload.as_ref()) {
                Some(msg) => format!("panicked: {}", msg),
                None => "panicked".to_string(),
            };
            TestResult::Failed(duration, msg)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::reporter::JsonReporter;
    use crate::suite::TestClass;
    use condignore_core::{Always, ConditionDescriptor, IgnoreCondition, TestMethod, assume_true, fail};

    fn mixed_suite() -> Suite {
        Suite::new().class(
            TestClass::without_fixture("Mixed")
                .test("test_pass", |_| Ok(()))
                .test("test_fail", |_| fail("expected 1, got 2"))
                .test_with(
                    TestMethod::new("test_ignored").conditional_ignore(ConditionDescriptor::of::<Always>()),
                    |_| fail("must not run"),
                )
                .test("test_assume", |_| assume_true(false, "no network"))
                .test("test_panic", |_| panic!("boom")),
        )
    }

    fn run(suite: &Suite, config: &RunConfig) -> TestSummary {
        let mut reporter = JsonReporter::new(Vec::new());
        run_suite(suite, config, &mut reporter).unwrap()
    }

    #[test]
    fn test_summary_counts_each_outcome() {
        let summary = run(&mixed_suite(), &RunConfig::default());
        assert_eq!(summary.total, 5);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.errored, 0);
        assert!(summary.has_failures());
    }

    #[test]
    fn test_stop_on_fail() {
        let config = RunConfig {
            stop_on_fail: true,
            ..RunConfig::default()
        };
        let summary = run(&mixed_suite(), &config);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn test_filter_selects_by_id() {
        let config = RunConfig {
            filter: Some("Mixed::test_ignored".to_string()),
            ..RunConfig::default()
        };
        let summary = run(&mixed_suite(), &config);
        assert_eq!(summary.total, 1);
        assert_eq!(summary.skipped, 1);
        assert!(!summary.has_failures());
    }

    #[test]
    fn test_skip_filters_exclude_tests() {
        let config = RunConfig {
            skip: vec!["test_fail".to_string(), "test_panic".to_string()],
            ..RunConfig::default()
        };
        let summary = run(&mixed_suite(), &config);
        assert_eq!(summary.total, 3);
        assert!(!summary.has_failures());
    }

    #[test]
    fn test_skip_with_exact_needs_full_id() {
        let config = RunConfig {
            skip: vec!["test_fail".to_string(), "Mixed::test_panic".to_string()],
            exact: true,
            ..RunConfig::default()
        };
        let ids: Vec<String> = filter_tests(mixed_suite().collect(), &config).iter().map(TestInfo::id).collect();
        assert_eq!(ids, vec!["Mixed::test_pass", "Mixed::test_fail", "Mixed::test_ignored", "Mixed::test_assume"]);
    }

    #[test]
    fn test_panicking_condition_constructor_is_an_error() {
        struct Exploding;

        impl Default for Exploding {
            fn default() -> Self {
                panic!("constructor threw")
            }
        }

        impl IgnoreCondition for Exploding {
            fn is_satisfied(&self) -> bool {
                true
            }
        }

        let suite = Suite::new().class(TestClass::without_fixture("Fragile").test_with(
            TestMethod::new("test_exploding").conditional_ignore(ConditionDescriptor::of::<Exploding>()),
            |_| Ok(()),
        ));
        let tests = suite.collect();
        match run_single_test(&suite, &tests[0]) {
            TestResult::Errored(_, err) => assert!(err.to_string().contains("panicked: constructor threw")),
            other => panic!("expected configuration error, got {:?}", other),
        }
        assert_eq!(run(&suite, &RunConfig::default()).errored, 1);
    }

    #[test]
    fn test_panic_is_reported_as_failure() {
        let suite = mixed_suite();
        let test = suite.collect().into_iter().find(|t| t.function_name == "test_panic").unwrap();
        match run_single_test(&suite, &test) {
            TestResult::Failed(_, msg) => assert_eq!(msg, "panicked: boom"),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_ignored_test_reports_condition_name() {
        let suite = mixed_suite();
        let test = suite.collect().into_iter().find(|t| t.function_name == "test_ignored").unwrap();
        match run_single_test(&suite, &test) {
            TestResult::Skipped(reason) => assert_eq!(reason, "Ignored by Always"),
            other => panic!("expected skip, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_suite_has_no_failures() {
        let summary = run(&Suite::new(), &RunConfig::default());
        assert_eq!(summary.total, 0);
        assert!(!summary.has_failures());
    }
}
