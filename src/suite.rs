//! Test suites: named test cases grouped by the fixture they run against.
//!
//! A [`TestClass<T>`] plays the role of a test class: every method runs against a fresh `T` built by the class's
//! setup function, and that instance is what bound ignore conditions are built from. A [`Suite`] collects classes
//! of different fixture types together with the [`MethodRule`]s applied around every method.
//!
//! ## Examples
//! ```rust
//! use condignore::suite::{Suite, TestClass};
//! use condignore::{Always, ConditionDescriptor, TestMethod};
//!
//! let suite = Suite::new().class(
//!     TestClass::new("Arithmetic", || 2)
//!         .test("doubles", |two: &i32| condignore::assume_true(two * 2 == 4, "math broke"))
//!         .test_with(
//!             TestMethod::new("never_runs").conditional_ignore(ConditionDescriptor::of::<Always>()),
//!             |_: &i32| condignore::fail("should have been skipped"),
//!         ),
//! );
//! assert_eq!(suite.collect().len(), 2);
//! ```

use std::any::Any;
use std::fmt;

use condignore_core::{ConditionalIgnoreRule, ConfigError, MethodRule, Signal, Statement, TestMethod};

/// Body of a test case, run against the class fixture.
pub type TestBody<T> = Box<dyn Fn(&T) -> Result<(), Signal>>;

/// A named group of test cases sharing one fixture type.
pub struct TestClass<T> {
    name: String,
    setup: Box<dyn Fn() -> T>,
    cases: Vec<(TestMethod, TestBody<T>)>,
}

impl<T: 'static> TestClass<T> {
    /// Create a class whose fixture is built by `setup` before every test method.
    pub fn new(name: impl Into<String>, setup: impl Fn() -> T + 'static) -> Self {
        Self {
            name: name.into(),
            setup: Box::new(setup),
            cases: Vec::new(),
        }
    }

    /// Register a test case without markers.
    pub fn test(self, name: impl Into<String>, body: impl Fn(&T) -> Result<(), Signal> + 'static) -> Self {
        self.test_with(TestMethod::new(name), body)
    }

    /// Register a test case with its full metadata (e.g. a conditional-ignore marker).
    pub fn test_with(mut self, method: TestMethod, body: impl Fn(&T) -> Result<(), Signal> + 'static) -> Self {
        self.cases.push((method, Box::new(body)));
        self
    }
}

impl TestClass<()> {
    /// A class whose tests need no fixture.
    pub fn without_fixture(name: impl Into<String>) -> Self {
        Self::new(name, || ())
    }
}

/// Type-erased view of a [`TestClass`], so classes with different fixtures can share a suite.
trait ErasedClass {
    fn name(&self) -> &str;
    fn methods(&self) -> Vec<&TestMethod>;
    fn execute(&self, index: usize, rules: &[Box<dyn MethodRule>]) -> Result<Result<(), Signal>, ConfigError>;
}

impl<T: 'static> ErasedClass for TestClass<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn methods(&self) -> Vec<&TestMethod> {
        self.cases.iter().map(|(method, _)| method).collect()
    }

    fn execute(&self, index: usize, rules: &[Box<dyn MethodRule>]) -> Result<Result<(), Signal>, ConfigError> {
        let Some((method, body)) = self.cases.get(index) else {
            return Ok(Err(Signal::Failed(format!("no test case #{} in {}", index, self.name))));
        };

        let instance = (self.setup)();
        let target: &dyn Any = &instance;

        let mut statement: Box<dyn Statement + '_> = Box::new(|| body(&instance));
        for rule in rules {
            statement = rule.apply(statement, method, Some(target))?;
        }

        Ok(statement.evaluate())
    }
}

/// Information about a collected test.
#[derive(Debug, Clone)]
pub struct TestInfo {
    pub class_name: String,
    pub function_name: String,
    /// Full type name of the attached ignore condition, if any
    pub ignore_condition: Option<&'static str>,
    class_index: usize,
    case_index: usize,
}

impl TestInfo {
    /// Test id in `Class::method` form, as used for filtering and reporting.
    pub fn id(&self) -> String {
        format!("{}::{}", self.class_name, self.function_name)
    }

    /// Build a standalone record (for reporters and tests that do not run a suite).
    pub fn detached(class_name: impl Into<String>, function_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            function_name: function_name.into(),
            ignore_condition: None,
            class_index: usize::MAX,
            case_index: usize::MAX,
        }
    }
}

/// An ordered collection of test classes and the rules applied around each method.
pub struct Suite {
    classes: Vec<Box<dyn ErasedClass>>,
    rules: Vec<Box<dyn MethodRule>>,
}

impl Default for Suite {
    fn default() -> Self {
        Self::new()
    }
}

impl Suite {
    /// Create an empty suite with [`ConditionalIgnoreRule`] installed.
    pub fn new() -> Self {
        Self {
            classes: Vec::new(),
            rules: vec![Box::new(ConditionalIgnoreRule)],
        }
    }

    /// Create an empty suite without any rule.
    pub fn without_rules() -> Self {
        Self {
            classes: Vec::new(),
            rules: Vec::new(),
        }
    }

    /// Add a test class. Classes run in the order they are added.
    pub fn class<T: 'static>(mut self, class: TestClass<T>) -> Self {
        self.classes.push(Box::new(class));
        self
    }

    /// Add a rule. Rules wrap the test statement in registration order, so the last one is outermost.
    pub fn with_rule(mut self, rule: impl MethodRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// All tests in registration order.
    pub fn collect(&self) -> Vec<TestInfo> {
        let mut tests = Vec::new();
        for (class_index, class) in self.classes.iter().enumerate() {
            for (case_index, method) in class.methods().into_iter().enumerate() {
                tests.push(TestInfo {
                    class_name: class.name().to_string(),
                    function_name: method.name().to_string(),
                    ignore_condition: method.ignore_condition().map(|d| d.condition_name()),
                    class_index,
                    case_index,
                });
            }
        }
        tests
    }

    /// Build the fixture, apply the rules, and evaluate the resulting statement for one test.
    ///
    /// The outer `Result` carries configuration errors raised while applying rules; the inner one is the
    /// statement's own outcome.
    pub fn execute(&self, test: &TestInfo) -> Result<Result<(), Signal>, ConfigError> {
        match self.classes.get(test.class_index) {
            Some(class) => class.execute(test.case_index, &self.rules),
            None => Ok(Err(Signal::Failed(format!("{} does not belong to this suite", test.id())))),
        }
    }
}

impl fmt::Debug for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suite")
            .field("classes", &self.classes.iter().map(|c| c.name()).collect::<Vec<_>>())
            .field("rules", &self.rules.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use condignore_core::{Always, ConditionDescriptor, IgnoreCondition, Never};
    use std::cell::Cell;
    use std::rc::Rc;

    struct Database {
        online: bool,
    }

    struct Offline(bool);

    impl IgnoreCondition for Offline {
        fn is_satisfied(&self) -> bool {
            self.0
        }
    }

    fn database_class(online: bool) -> TestClass<Database> {
        TestClass::new("DatabaseTest", move || Database { online })
            .test("test_plain", |_| Ok(()))
            .test_with(
                TestMethod::new("test_needs_db")
                    .conditional_ignore(ConditionDescriptor::bound(|db: &Database| Offline(!db.online))),
                |db| condignore_core::assume_true(db.online, "unreachable when offline"),
            )
    }

    #[test]
    fn test_collect_in_registration_order() {
        let suite = Suite::new()
            .class(database_class(true))
            .class(TestClass::without_fixture("Plain").test("test_x", |_| Ok(())));

        let ids: Vec<String> = suite.collect().iter().map(TestInfo::id).collect();
        assert_eq!(
            ids,
            vec!["DatabaseTest::test_plain", "DatabaseTest::test_needs_db", "Plain::test_x"]
        );
        assert!(suite.collect()[1].ignore_condition.unwrap().ends_with("Offline"));
    }

    #[test]
    fn test_bound_condition_sees_fresh_fixture() {
        let offline = Suite::new().class(database_class(false));
        let tests = offline.collect();
        assert_eq!(
            offline.execute(&tests[1]).unwrap(),
            Err(Signal::AssumptionFailed("Ignored by Offline".to_string()))
        );

        let online = Suite::new().class(database_class(true));
        let tests = online.collect();
        assert_eq!(online.execute(&tests[1]).unwrap(), Ok(()));
    }

    #[test]
    fn test_fixture_built_per_invocation() {
        let built = Rc::new(Cell::new(0));
        let counter = Rc::clone(&built);
        let suite = Suite::new().class(
            TestClass::new("Counting", move || counter.set(counter.get() + 1))
                .test("a", |_| Ok(()))
                .test("b", |_| Ok(())),
        );

        for test in suite.collect() {
            suite.execute(&test).unwrap().unwrap();
        }
        assert_eq!(built.get(), 2);
    }

    #[test]
    fn test_without_rules_ignores_markers() {
        let suite = Suite::without_rules().class(TestClass::without_fixture("Raw").test_with(
            TestMethod::new("test_marked").conditional_ignore(ConditionDescriptor::of::<Always>()),
            |_| Ok(()),
        ));
        let tests = suite.collect();
        assert_eq!(suite.execute(&tests[0]).unwrap(), Ok(()));
    }

    #[test]
    fn test_unsatisfied_marker_runs_body() {
        let suite = Suite::new().class(TestClass::without_fixture("Raw").test_with(
            TestMethod::new("test_marked").conditional_ignore(ConditionDescriptor::of::<Never>()),
            |_| condignore_core::fail("ran"),
        ));
        let tests = suite.collect();
        assert_eq!(suite.execute(&tests[0]).unwrap(), Err(Signal::Failed("ran".to_string())));
    }

    #[test]
    fn test_detached_info_is_not_runnable() {
        let suite = Suite::new();
        let info = TestInfo::detached("Ghost", "test_missing");
        assert!(matches!(suite.execute(&info), Ok(Err(Signal::Failed(_)))));
    }
}
