//! Test result reporters
//!
//! ## TestReporter Trait
//!
//! The test runner uses a `TestReporter` trait to separate reporting from
//! execution. Two implementations ship with the harness:
//!
//! - [`ConsoleReporter`]: pytest-style progress lines, a FAILURES section and a summary line
//! - [`JsonReporter`]: one JSON object per event, shaped like libtest's JSON output

use std::fmt::Write as _;
use std::io::{self, Write};

use miette::{GraphicalReportHandler, GraphicalTheme};
use serde_json::{Value, json};

use super::test_runner::{TestResult, TestSummary};
use crate::suite::TestInfo;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const BOLD_RED: &str = "\x1b[1;31m";
const BOLD_GREEN: &str = "\x1b[1;32m";
const RESET: &str = "\x1b[0m";

// ============================================================================
// Test Reporter Trait
// ============================================================================

/// Trait for reporting test execution results.
///
/// Implement this trait to customize test output format (JSON, TAP, etc.)
pub trait TestReporter {
    /// Called when test collection is complete
    fn on_collection_complete(&mut self, test_count: usize) -> io::Result<()>;

    /// Called when a test run begins
    fn on_test_start(&mut self, _test: &TestInfo) -> io::Result<()> {
        Ok(())
    }

    /// Called when a test completes
    fn on_test_complete(&mut self, test: &TestInfo, result: &TestResult) -> io::Result<()>;

    /// Called when all tests have completed
    fn on_run_complete(&mut self, summary: &TestSummary) -> io::Result<()>;
}

// ============================================================================
// Console reporter
// ============================================================================

/// Default console reporter (pytest-style)
pub struct ConsoleReporter<W> {
    out: W,
    verbose: bool,
    color: bool,
    /// (test id, rendered details) for the FAILURES section
    failures: Vec<(String, String)>,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, verbose: bool, color: bool) -> Self {
        Self {
            out,
            verbose,
            color,
            failures: Vec::new(),
        }
    }

    /// Consume the reporter, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, style: &str, text: &str) -> String {
        if self.color {
            format!("{}{}{}", style, text, RESET)
        } else {
            text.to_string()
        }
    }

    fn status(&self, result: &TestResult) -> String {
        match result {
            TestResult::Passed(d) => {
                if self.verbose {
                    format!("{} ({}ms)", self.paint(GREEN, "PASSED"), d.as_millis())
                } else {
                    self.paint(GREEN, "PASSED")
                }
            }
            TestResult::Failed(d, _) => {
                if self.verbose {
                    format!("{} ({}ms)", self.paint(RED, "FAILED"), d.as_millis())
                } else {
                    self.paint(RED, "FAILED")
                }
            }
            TestResult::Skipped(reason) => {
                if reason.is_empty() {
                    self.paint(YELLOW, "SKIPPED")
                } else {
                    format!("{} ({})", self.paint(YELLOW, "SKIPPED"), reason)
                }
            }
            TestResult::Errored(..) => self.paint(RED, "ERROR"),
        }
    }

    fn render_config_error(&self, err: &condignore_core::ConfigError) -> String {
        let theme = if self.color {
            GraphicalTheme::unicode()
        } else {
            GraphicalTheme::unicode_nocolor()
        };
        let mut rendered = String::new();
        if GraphicalReportHandler::new_themed(theme)
            .with_width(400)
            .render_report(&mut rendered, err)
            .is_err()
        {
            rendered.clear();
            let _ = write!(rendered, "{}", err);
        }
        rendered
    }
}

impl<W: Write> TestReporter for ConsoleReporter<W> {
    fn on_collection_complete(&mut self, test_count: usize) -> io::Result<()> {
        if test_count == 0 {
            return writeln!(self.out, "No tests collected");
        }
        let header = self.paint(BOLD, "=================== test session starts ===================");
        writeln!(self.out, "{}", header)?;
        writeln!(self.out, "collected {} item(s)", test_count)?;
        writeln!(self.out)
    }

    fn on_test_complete(&mut self, test: &TestInfo, result: &TestResult) -> io::Result<()> {
        let status = self.status(result);
        writeln!(self.out, "{} {}", test.id(), status)?;

        match result {
            TestResult::Failed(_, msg) => self.failures.push((test.id(), msg.clone())),
            TestResult::Errored(_, err) => {
                let rendered = self.render_config_error(err);
                self.failures.push((test.id(), rendered));
            }
            _ => {}
        }
        Ok(())
    }

    fn on_run_complete(&mut self, summary: &TestSummary) -> io::Result<()> {
        if summary.total == 0 {
            return Ok(());
        }

        if !self.failures.is_empty() {
            writeln!(self.out)?;
            let title = self.paint(BOLD_RED, "=================== FAILURES ===================");
            writeln!(self.out, "{}", title)?;
            for (id, details) in std::mem::take(&mut self.failures) {
                writeln!(self.out)?;
                let banner = self.paint(BOLD, &format!("___________ {} ___________", id));
                writeln!(self.out, "{}", banner)?;
                writeln!(self.out)?;
                for line in details.lines() {
                    writeln!(self.out, "    {}", line)?;
                }
            }
        }

        let mut parts = Vec::new();
        if summary.passed > 0 {
            parts.push(format!("{} passed", summary.passed));
        }
        if summary.failed > 0 {
            parts.push(format!("{} failed", summary.failed));
        }
        if summary.skipped > 0 {
            parts.push(format!("{} skipped", summary.skipped));
        }
        if summary.errored > 0 {
            let noun = if summary.errored == 1 { "error" } else { "errors" };
            parts.push(format!("{} {}", summary.errored, noun));
        }

        let summary_color = if summary.has_failures() { BOLD_RED } else { BOLD_GREEN };
        let line = format!(
            "=================== {} in {:.2}s ===================",
            parts.join(", "),
            summary.duration.as_secs_f64()
        );
        let line = self.paint(summary_color, &line);
        writeln!(self.out)?;
        writeln!(self.out, "{}", line)?;
        self.out.flush()
    }
}

// ============================================================================
// JSON reporter
// ============================================================================

/// Writes one JSON object per line for every event.
pub struct JsonReporter<W> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the reporter, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, event: Value) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, &event)?;
        writeln!(self.out)
    }
}

impl<W: Write> TestReporter for JsonReporter<W> {
    fn on_collection_complete(&mut self, test_count: usize) -> io::Result<()> {
        self.emit(json!({ "type": "suite", "event": "started", "test_count": test_count }))
    }

    fn on_test_start(&mut self, test: &TestInfo) -> io::Result<()> {
        self.emit(json!({ "type": "test", "event": "started", "name": test.id() }))
    }

    fn on_test_complete(&mut self, test: &TestInfo, result: &TestResult) -> io::Result<()> {
        let event = match result {
            TestResult::Passed(d) => json!({
                "type": "test", "event": "ok", "name": test.id(), "exec_time": d.as_secs_f64()
            }),
            TestResult::Failed(d, msg) => json!({
                "type": "test", "event": "failed", "name": test.id(), "exec_time": d.as_secs_f64(),
                "message": msg
            }),
            TestResult::Skipped(reason) => json!({
                "type": "test", "event": "ignored", "name": test.id(), "message": reason
            }),
            TestResult::Errored(d, err) => json!({
                "type": "test", "event": "error", "name": test.id(), "exec_time": d.as_secs_f64(),
                "message": err.to_string(), "condition": err.condition()
            }),
        };
        self.emit(event)
    }

    fn on_run_complete(&mut self, summary: &TestSummary) -> io::Result<()> {
        let status = if summary.has_failures() { "failed" } else { "ok" };
        self.emit(json!({
            "type": "suite",
            "event": status,
            "passed": summary.passed,
            "failed": summary.failed,
            "ignored": summary.skipped,
            "errored": summary.errored,
            "exec_time": summary.duration.as_secs_f64()
        }))?;
        self.out.flush()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use condignore_core::ConfigError;
    use std::time::Duration;

    fn info(name: &str) -> TestInfo {
        TestInfo::detached("ConditionalIgnoreTest", name)
    }

    fn unbound_error() -> ConfigError {
        ConfigError::UnboundCondition {
            condition: "suite::OtherCase::Offline".to_string(),
            owner: "suite::OtherCase",
            found: "the test instance has a different type",
        }
    }

    fn console_output(verbose: bool, events: &[(TestInfo, TestResult)], summary: &TestSummary) -> String {
        let mut reporter = ConsoleReporter::new(Vec::new(), verbose, false);
        reporter.on_collection_complete(events.len()).unwrap();
        for (test, result) in events {
            reporter.on_test_start(test).unwrap();
            reporter.on_test_complete(test, result).unwrap();
        }
        reporter.on_run_complete(summary).unwrap();
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_console_session_snapshot() {
        let events = vec![
            (info("testA"), TestResult::Passed(Duration::ZERO)),
            (info("testB"), TestResult::Skipped("Ignored by AlwaysTrue".to_string())),
            (info("testC"), TestResult::Failed(Duration::ZERO, "expected 1, got 2".to_string())),
        ];
        let summary = TestSummary {
            total: 3,
            passed: 1,
            failed: 1,
            skipped: 1,
            errored: 0,
            duration: Duration::ZERO,
        };

        insta::assert_snapshot!(console_output(false, &events, &summary), @r"
=================== test session starts ===================
collected 3 item(s)

ConditionalIgnoreTest::testA PASSED
ConditionalIgnoreTest::testB SKIPPED (Ignored by AlwaysTrue)
ConditionalIgnoreTest::testC FAILED

=================== FAILURES ===================

___________ ConditionalIgnoreTest::testC ___________

    expected 1, got 2

=================== 1 passed, 1 failed, 1 skipped in 0.00s ===================
");
    }

    #[test]
    fn test_console_renders_config_error_details() {
        let events = vec![(info("testD"), TestResult::Errored(Duration::ZERO, unbound_error()))];
        let summary = TestSummary {
            total: 1,
            errored: 1,
            ..TestSummary::default()
        };

        let output = console_output(false, &events, &summary);
        assert!(output.contains("ConditionalIgnoreTest::testD ERROR"));
        assert!(output.contains("condignore::unbound_condition"));
        assert!(output.contains("inside the test case"));
        assert!(output.contains("1 error in 0.00s"));
    }

    #[test]
    fn test_console_verbose_shows_durations() {
        let events = vec![(info("testA"), TestResult::Passed(Duration::from_millis(7)))];
        let summary = TestSummary {
            total: 1,
            passed: 1,
            ..TestSummary::default()
        };
        let output = console_output(true, &events, &summary);
        assert!(output.contains("ConditionalIgnoreTest::testA PASSED (7ms)"));
    }

    #[test]
    fn test_console_color_wraps_status() {
        let mut reporter = ConsoleReporter::new(Vec::new(), false, true);
        reporter
            .on_test_complete(&info("testB"), &TestResult::Skipped(String::new()))
            .unwrap();
        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(output, "ConditionalIgnoreTest::testB \x1b[33mSKIPPED\x1b[0m\n");
    }

    #[test]
    fn test_console_empty_run() {
        let output = console_output(false, &[], &TestSummary::default());
        assert_eq!(output, "No tests collected\n");
    }

    #[test]
    fn test_json_events_are_one_per_line() {
        let mut reporter = JsonReporter::new(Vec::new());
        reporter.on_collection_complete(2).unwrap();
        reporter.on_test_start(&info("testB")).unwrap();
        reporter
            .on_test_complete(&info("testB"), &TestResult::Skipped("Ignored by AlwaysTrue".to_string()))
            .unwrap();
        reporter.on_test_start(&info("testD")).unwrap();
        reporter
            .on_test_complete(&info("testD"), &TestResult::Errored(Duration::ZERO, unbound_error()))
            .unwrap();
        reporter
            .on_run_complete(&TestSummary {
                total: 2,
                skipped: 1,
                errored: 1,
                ..TestSummary::default()
            })
            .unwrap();

        let output = String::from_utf8(reporter.into_inner()).unwrap();
        let events: Vec<Value> = output.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(events.len(), 6);
        assert_eq!(events[0]["test_count"], 2);
        assert_eq!(events[2]["event"], "ignored");
        assert_eq!(events[2]["message"], "Ignored by AlwaysTrue");
        assert_eq!(events[4]["event"], "error");
        assert_eq!(events[4]["condition"], "suite::OtherCase::Offline");
        assert_eq!(events[5]["event"], "failed");
        assert_eq!(events[5]["ignored"], 1);
    }
}
