//! Method rules: the interception point a harness offers around every test method.
//!
//! ## Notes
//!
//! - A rule receives the method's statement and returns the statement that should run instead. Returning `base`
//!   unchanged means "no opinion".
//! - [`ConditionalIgnoreRule`] is the rule that turns a satisfied [`IgnoreCondition`] into a skip.

use std::any::Any;

use crate::condition::IgnoreCondition;
use crate::errors::ConfigError;
use crate::method::TestMethod;
use crate::statement::{Signal, Statement};

/// Wraps a test method's statement before it runs.
pub trait MethodRule {
    /// Return the statement to run in place of `base`.
    ///
    /// `target` is the test-case instance the method runs against, when the harness has one.
    fn apply<'a>(
        &self,
        base: Box<dyn Statement + 'a>,
        method: &TestMethod,
        target: Option<&dyn Any>,
    ) -> Result<Box<dyn Statement + 'a>, ConfigError>;
}

/// Skips a test when the condition attached to it through
/// [`TestMethod::conditional_ignore`] is satisfied.
///
/// The condition is built fresh on every `apply` and queried exactly once. A satisfied condition replaces the
/// statement by one that raises [`Signal::AssumptionFailed`] with the reason `Ignored by <condition name>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConditionalIgnoreRule;

impl MethodRule for ConditionalIgnoreRule {
    fn apply<'a>(
        &self,
        base: Box<dyn Statement + 'a>,
        method: &TestMethod,
        target: Option<&dyn Any>,
    ) -> Result<Box<dyn Statement + 'a>, ConfigError> {
        let Some(descriptor) = method.ignore_condition() else {
            return Ok(base);
        };

        let condition = descriptor.instantiate(target)?;
        if !condition.is_satisfied() {
            tracing::trace!(
                method = method.name(),
                condition = descriptor.condition_name(),
                "condition not satisfied"
            );
            return Ok(base);
        }

        tracing::debug!(
            method = method.name(),
            condition = descriptor.condition_name(),
            "condition satisfied, ignoring test"
        );
        Ok(Box::new(IgnoreStatement { condition }))
    }
}

struct IgnoreStatement {
    condition: Box<dyn IgnoreCondition>,
}

impl Statement for IgnoreStatement {
    fn evaluate(&self) -> Result<(), Signal> {
        Err(Signal::AssumptionFailed(format!("Ignored by {}", self.condition.name())))
    }
}
