//! Harness command line for condignore test suites
//!
//! Test binaries declared with `harness = false` hand their [`Suite`] to [`run`], which parses the arguments
//! cargo forwards, runs the suite and exits with the appropriate code.
//!
//! ## Modules
//!
//! - `reporter` - Console (pytest-style) and JSON reporters
//! - `test_runner` - Filtering and execution of collected tests
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod reporter;
pub mod test_runner;

use std::fmt;
use std::io::{self, IsTerminal, Write};
use std::process;

use clap::{Parser, ValueEnum};

use crate::suite::Suite;
use reporter::{ConsoleReporter, JsonReporter, TestReporter};
use test_runner::{RunConfig, run_suite};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::failure(format!("failed to write test report: {}", err))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Output format for test results
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Human-readable, pytest-style output
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// When to color console output
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Auto,
    Always,
    Never,
}

impl Color {
    fn enabled(self) -> bool {
        match self {
            Color::Auto => io::stdout().is_terminal(),
            Color::Always => true,
            Color::Never => false,
        }
    }
}

/// Run a condignore test suite
#[derive(Parser, Debug, Default)]
#[command(version, about = "Run a condignore test suite", long_about = None)]
pub struct HarnessArgs {
    /// Only run tests whose id (`Class::method`) contains this string
    #[arg(value_name = "FILTER")]
    pub filter: Option<String>,

    /// Filter tests by keyword expression
    #[arg(short = 'k', value_name = "EXPR")]
    pub keyword: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Stop on first failure
    #[arg(short = 'x', long = "exitfirst")]
    pub stop_on_fail: bool,

    /// Match the filter against whole test ids only
    #[arg(long)]
    pub exact: bool,

    /// Skip tests whose id contains this string (repeatable)
    #[arg(long, value_name = "FILTER")]
    pub skip: Vec<String>,

    /// List tests instead of running them
    #[arg(long)]
    pub list: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Pretty)]
    pub format: Format,

    /// Color console output
    #[arg(long, value_enum, default_value_t = Color::Auto)]
    pub color: Color,

    // Accepted for compatibility with flags cargo and libtest users pass; they have no effect.
    #[arg(long, hide = true)]
    pub nocapture: bool,
    #[arg(short, long, hide = true)]
    pub quiet: bool,
    #[arg(long, hide = true, value_name = "N")]
    pub test_threads: Option<usize>,
    #[arg(long, hide = true)]
    pub ignored: bool,
    #[arg(long, hide = true)]
    pub include_ignored: bool,
}

impl HarnessArgs {
    /// Parse the process arguments, exiting with clap's usage message on error.
    pub fn from_env() -> Self {
        Self::parse()
    }

    /// Runner configuration derived from the arguments.
    ///
    /// The positional filter takes precedence over `-k`.
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            verbose: self.verbose,
            stop_on_fail: self.stop_on_fail,
            filter: self.filter.clone().or_else(|| self.keyword.clone()),
            exact: self.exact,
            skip: self.skip.clone(),
        }
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main harness entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run(suite: &Suite) {
    let args = HarnessArgs::from_env();

    match execute(&args, suite) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the harness for parsed arguments, writing the report to stdout.
pub fn execute(args: &HarnessArgs, suite: &Suite) -> CliResult<ExitCode> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.list {
        return list_tests(suite, &args.run_config(), &mut out);
    }

    match args.format {
        Format::Pretty => {
            let mut reporter = ConsoleReporter::new(out, args.verbose, args.color.enabled());
            execute_with(args, suite, &mut reporter)
        }
        Format::Json => {
            let mut reporter = JsonReporter::new(out);
            execute_with(args, suite, &mut reporter)
        }
    }
}

/// Execute the harness with a caller-provided reporter.
pub fn execute_with(args: &HarnessArgs, suite: &Suite, reporter: &mut dyn TestReporter) -> CliResult<ExitCode> {
    let summary = run_suite(suite, &args.run_config(), reporter)?;

    if summary.has_failures() {
        // Tests failed - return error with empty message (summary already printed)
        Err(CliError::new("", ExitCode::FAILURE))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Print collected tests in libtest's `--list` format.
fn list_tests(suite: &Suite, config: &RunConfig, out: &mut impl Write) -> CliResult<ExitCode> {
    let tests = test_runner::filter_tests(suite.collect(), config);
    for test in &tests {
        writeln!(out, "{}: test", test.id())?;
    }
    writeln!(out)?;
    writeln!(out, "{} tests, 0 benchmarks", tests.len())?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// Tests
// ============================================================================
