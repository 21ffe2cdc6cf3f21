#![forbid(unsafe_code)]
//! Provide the pieces needed to skip a test method at runtime when a user-supplied condition holds.
//!
//! This crate is dependency-light and contains no IO and no global state. A test harness plugs it in through the
//! [`MethodRule`] seam: before a test body runs, the rule receives the body as a [`Statement`] together with the
//! method's [`TestMethod`] metadata and may hand back a different statement.
//!
//! ## Notes
//!
//! - There is no reflection: a condition is attached to a method through a [`ConditionDescriptor`], which holds the
//!   factory that builds a fresh condition object for every invocation.
//! - A factory either needs nothing (a *static* condition) or needs the test-case instance (a *bound* condition).
//!   Bound factories that receive an incompatible instance produce [`ConfigError::UnboundCondition`].
//!
//! ## Examples
//! ```rust
//! use condignore_core::{ConditionDescriptor, ConditionalIgnoreRule, IgnoreCondition, MethodRule, Signal, TestMethod};
//!
//! #[derive(Default)]
//! struct AlwaysTrue;
//!
//! impl IgnoreCondition for AlwaysTrue {
//!     fn is_satisfied(&self) -> bool {
//!         true
//!     }
//! }
//!
//! let method = TestMethod::new("test_b").conditional_ignore(ConditionDescriptor::of::<AlwaysTrue>());
//! let base = Box::new(|| -> Result<(), Signal> { Ok(()) });
//! let statement = ConditionalIgnoreRule.apply(base, &method, None).unwrap();
//! assert_eq!(
//!     statement.evaluate(),
//!     Err(Signal::AssumptionFailed("Ignored by AlwaysTrue".to_string()))
//! );
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod condition;
pub mod descriptor;
pub mod errors;
pub mod method;
pub mod rule;
pub mod statement;

pub use condition::{Always, EnvVarSet, IgnoreCondition, Never, RunningOn, simple_type_name};
pub use descriptor::ConditionDescriptor;
pub use errors::{ConfigError, panic_message};
pub use method::TestMethod;
pub use rule::{ConditionalIgnoreRule, MethodRule};
pub use statement::{Signal, Statement, assume_true, fail};
