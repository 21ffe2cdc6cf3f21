//! Execution units and the signals they raise.
//!
//! A [`Statement`] is one runnable piece of a test: usually the test body itself, possibly wrapped by one or more
//! [`MethodRule`](crate::MethodRule)s. Evaluating it either succeeds or raises a [`Signal`].

use thiserror::Error;

/// Why a statement did not complete normally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Signal {
    /// An assumption did not hold. The test is reported as skipped, never as failed.
    #[error("assumption failed: {0}")]
    AssumptionFailed(String),

    /// The test failed.
    #[error("{0}")]
    Failed(String),
}

impl Signal {
    /// Whether this signal marks a skip rather than a failure.
    pub fn is_skip(&self) -> bool {
        matches!(self, Signal::AssumptionFailed(_))
    }

    /// The message carried by the signal.
    pub fn message(&self) -> &str {
        match self {
            Signal::AssumptionFailed(msg) | Signal::Failed(msg) => msg,
        }
    }
}

/// A runnable unit of a test.
pub trait Statement {
    fn evaluate(&self) -> Result<(), Signal>;
}

impl<F> Statement for F
where
    F: Fn() -> Result<(), Signal>,
{
    fn evaluate(&self) -> Result<(), Signal> {
        self()
    }
}

/// Skip the current test unless `condition` holds.
///
/// ## Examples
/// ```rust
/// use condignore_core::{Signal, assume_true};
///
/// assert_eq!(assume_true(true, "network"), Ok(()));
/// assert_eq!(
///     assume_true(false, "network"),
///     Err(Signal::AssumptionFailed("network".to_string()))
/// );
/// ```
pub fn assume_true(condition: bool, message: impl Into<String>) -> Result<(), Signal> {
    if condition {
        Ok(())
    } else {
        Err(Signal::AssumptionFailed(message.into()))
    }
}

/// Fail the current test with a message.
pub fn fail(message: impl Into<String>) -> Result<(), Signal> {
    Err(Signal::Failed(message.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_a_statement() {
        let ok = || -> Result<(), Signal> { Ok(()) };
        assert_eq!(ok.evaluate(), Ok(()));

        let failing = || fail("boom");
        assert_eq!(failing.evaluate(), Err(Signal::Failed("boom".to_string())));
    }

    #[test]
    fn test_signal_kind_and_message() {
        let skip = Signal::AssumptionFailed("Ignored by X".to_string());
        assert!(skip.is_skip());
        assert_eq!(skip.message(), "Ignored by X");
        assert_eq!(skip.to_string(), "assumption failed: Ignored by X");

        let failure = Signal::Failed("nope".to_string());
        assert!(!failure.is_skip());
        assert_eq!(failure.to_string(), "nope");
    }
}
