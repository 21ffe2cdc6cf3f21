//! Configuration errors raised while preparing a conditionally ignored test.

use std::any::Any;

use miette::Diagnostic;
use thiserror::Error;

/// Boxed error returned by fallible condition factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A condition attached to a test method could not be built.
///
/// These errors are fatal to the affected test method; the harness reports them instead of running the body.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error(
        "condition `{condition}` needs a `{owner}` test instance, but {found}. Either make the condition static \
         (build it without a test instance), standalone (declare it as its own type), or move it inside the test \
         case using it"
    )]
    #[diagnostic(
        code(condignore::unbound_condition),
        help("register conditions that need no test instance with `ConditionDescriptor::of` or `from_fn`")
    )]
    UnboundCondition {
        condition: String,
        owner: &'static str,
        found: &'static str,
    },

    #[error("failed to construct condition `{condition}`: {source}")]
    #[diagnostic(code(condignore::construction))]
    Construction {
        condition: String,
        #[source]
        source: BoxError,
    },
}

impl ConfigError {
    /// Full type name of the condition that could not be built.
    pub fn condition(&self) -> &str {
        match self {
            ConfigError::UnboundCondition { condition, .. } | ConfigError::Construction { condition, .. } => condition,
        }
    }
}

/// Text carried by a panic payload, if it is a string.
pub fn panic_message(payload: &(dyn Any + Send)) -> Option<&str> {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
}
