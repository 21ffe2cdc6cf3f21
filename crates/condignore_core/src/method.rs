//! Metadata about a single test method.

use crate::descriptor::ConditionDescriptor;

/// A test method as seen by [`MethodRule`](crate::MethodRule)s: its name and the markers attached to it.
#[derive(Debug, Clone)]
pub struct TestMethod {
    name: String,
    ignore_condition: Option<ConditionDescriptor>,
}

impl TestMethod {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ignore_condition: None,
        }
    }

    /// Skip this method whenever the condition built by `descriptor` is satisfied.
    ///
    /// A method carries at most one condition; attaching another replaces the previous one.
    pub fn conditional_ignore(mut self, descriptor: ConditionDescriptor) -> Self {
        self.ignore_condition = Some(descriptor);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ignore_condition(&self) -> Option<&ConditionDescriptor> {
        self.ignore_condition.as_ref()
    }
}
