//! Descriptors pair a test method with the factory that builds its ignore condition.
//!
//! ## Static vs. bound factories
//!
//! - A *static* factory needs nothing to build the condition ([`ConditionDescriptor::of`],
//!   [`ConditionDescriptor::from_fn`], [`ConditionDescriptor::try_from_fn`]).
//! - A *bound* factory needs the test-case instance the method runs against ([`ConditionDescriptor::bound`],
//!   [`ConditionDescriptor::try_bound`]). The instance is handed over as `&dyn Any` and must downcast to the owner
//!   type the factory was registered for.

use std::any::{Any, type_name};
use std::convert::Infallible;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::condition::IgnoreCondition;
use crate::errors::{BoxError, ConfigError, panic_message};

type Construct = dyn Fn(Option<&dyn Any>) -> Result<Box<dyn IgnoreCondition>, ConfigError> + Send + Sync;

/// The marker attached to a test method: which condition to build, and how.
///
/// Descriptors are immutable once created and cheap to clone.
#[derive(Clone)]
pub struct ConditionDescriptor {
    condition: &'static str,
    owner: Option<&'static str>,
    construct: Arc<Construct>,
}

impl ConditionDescriptor {
    /// Build the condition with its `Default` implementation (the zero-argument constructor).
    pub fn of<C>() -> Self
    where
        C: IgnoreCondition + Default + 'static,
    {
        Self::from_fn(C::default)
    }

    /// Build the condition with a factory that needs no test instance.
    pub fn from_fn<C, F>(factory: F) -> Self
    where
        C: IgnoreCondition + 'static,
        F: Fn() -> C + Send + Sync + 'static,
    {
        Self::try_from_fn(move || Ok::<C, Infallible>(factory()))
    }

    /// Like [`from_fn`](Self::from_fn), but the factory may fail.
    ///
    /// A failure is reported as [`ConfigError::Construction`] with the factory's error as its source.
    pub fn try_from_fn<C, E, F>(factory: F) -> Self
    where
        C: IgnoreCondition + 'static,
        E: Into<BoxError>,
        F: Fn() -> Result<C, E> + Send + Sync + 'static,
    {
        let condition = type_name::<C>();
        let construct: Arc<Construct> = Arc::new(move |_target: Option<&dyn Any>| {
            factory()
                .map(|c| Box::new(c) as Box<dyn IgnoreCondition>)
                .map_err(|e| construction_error(condition, e))
        });

        Self {
            condition,
            owner: None,
            construct,
        }
    }

    /// Build the condition from the test instance of type `O` the method runs against.
    pub fn bound<O, C, F>(factory: F) -> Self
    where
        O: 'static,
        C: IgnoreCondition + 'static,
        F: Fn(&O) -> C + Send + Sync + 'static,
    {
        Self::try_bound(move |owner: &O| Ok::<C, Infallible>(factory(owner)))
    }

    /// Like [`bound`](Self::bound), but the factory may fail.
    pub fn try_bound<O, C, E, F>(factory: F) -> Self
    where
        O: 'static,
        C: IgnoreCondition + 'static,
        E: Into<BoxError>,
        F: Fn(&O) -> Result<C, E> + Send + Sync + 'static,
    {
        let condition = type_name::<C>();
        let owner = type_name::<O>();
        let construct: Arc<Construct> = Arc::new(move |target: Option<&dyn Any>| {
            let found = match target {
                None => "no test instance was supplied",
                Some(instance) => match instance.downcast_ref::<O>() {
                    Some(instance) => {
                        return factory(instance)
                            .map(|c| Box::new(c) as Box<dyn IgnoreCondition>)
                            .map_err(|e| construction_error(condition, e));
                    }
                    None => "the test instance has a different type",
                },
            };
            Err(ConfigError::UnboundCondition {
                condition: condition.to_string(),
                owner,
                found,
            })
        });

        Self {
            condition,
            owner: Some(owner),
            construct,
        }
    }

    /// Full type name of the condition this descriptor builds.
    pub fn condition_name(&self) -> &'static str {
        self.condition
    }

    /// Type name of the test instance a bound factory needs, if any.
    pub fn owner_name(&self) -> Option<&'static str> {
        self.owner
    }

    pub fn requires_instance(&self) -> bool {
        self.owner.is_some()
    }

    /// Build a fresh condition.
    ///
    /// Static factories ignore `target`. Bound factories fail with [`ConfigError::UnboundCondition`] when `target`
    /// is missing or not of the owner type. A factory that panics yields [`ConfigError::Construction`] carrying the
    /// panic message.
    pub fn instantiate(&self, target: Option<&dyn Any>) -> Result<Box<dyn IgnoreCondition>, ConfigError> {
        panic::catch_unwind(AssertUnwindSafe(|| (self.construct)(target))).unwrap_or_else(|payload| {
            let cause = match panic_message(payload.as_ref()) {
                Some(msg) => format!("panicked: {}", msg),
                None => "panicked".to_string(),
            };
            Err(construction_error(self.condition, cause))
        })
    }
}

impl fmt::Debug for ConditionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionDescriptor")
            .field("condition", &self.condition)
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}

fn construction_error(condition: &'static str, err: impl Into<BoxError>) -> ConfigError {
    ConfigError::Construction {
        condition: condition.to_string(),
        source: err.into(),
    }
}
