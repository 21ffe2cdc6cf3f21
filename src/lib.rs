#![forbid(unsafe_code)]
//! Skip test methods at runtime when a registered condition is satisfied.
//!
//! The condition machinery lives in `condignore_core` and is re-exported here. This crate adds the host it plugs
//! into: test suites with per-method fixtures, a sequential runner, console/JSON reporters, and a command line
//! suitable for `harness = false` test targets.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use condignore::suite::{Suite, TestClass};
//! use condignore::{ConditionDescriptor, RunningOn, TestMethod};
//!
//! fn main() {
//!     let suite = Suite::new().class(
//!         TestClass::without_fixture("PathTest")
//!             .test("test_join", |_| Ok(()))
//!             .test_with(
//!                 TestMethod::new("test_drive_letters")
//!                     .conditional_ignore(ConditionDescriptor::from_fn(|| RunningOn("linux"))),
//!                 |_| Ok(()),
//!             ),
//!     );
//!     condignore::main(&suite);
//! }
//! ```
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Test bodies**: panics inside fixtures and test bodies are caught by the runner and reported as failures.

pub mod cli;
pub mod logging;
pub mod suite;

pub use condignore_core::{
    Always, ConditionDescriptor, ConditionalIgnoreRule, ConfigError, EnvVarSet, IgnoreCondition, MethodRule, Never,
    RunningOn, Signal, Statement, TestMethod, assume_true, fail, simple_type_name,
};

pub use cli::reporter::{ConsoleReporter, JsonReporter, TestReporter};
pub use cli::test_runner::{RunConfig, TestResult, TestSummary, run_suite};
pub use cli::{CliError, CliResult, ExitCode, HarnessArgs};
pub use suite::{Suite, TestClass, TestInfo};

/// Harness entry point: initialize logging, parse arguments, run `suite` and exit.
pub fn main(suite: &Suite) {
    logging::init();
    cli::run(suite);
}
