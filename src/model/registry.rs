//! Ordered, name-unique collection of tests.
//!
//! Insertion order is the order tests appear in `CTestTestfile.cmake`, so it is preserved exactly:
//! removing a test never moves the others, and modifying one in place (via [`TestRegistry::replace`])
//! keeps its slot.

use crate::error::{CtestError, CtestResult};

use super::property::PropertyBag;
use super::test::TestDefinition;

/// The set of tests one run will render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestRegistry {
    tests: Vec<TestDefinition>,
}

impl TestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.tests.iter().position(|t| t.name() == name)
    }

    /// Append a test.
    ///
    /// ## Errors
    /// [`CtestError::DuplicateName`] if a test with the same name exists, or [`CtestError::Validation`] if
    /// one of its properties has an empty name; the registry is unchanged either way.
    pub fn register(&mut self, test: TestDefinition) -> CtestResult<()> {
        test.properties().validate(test.name())?;
        if self.contains(test.name()) {
            return Err(CtestError::DuplicateName {
                name: test.name().to_string(),
            });
        }
        tracing::debug!(test = test.name(), "registered test");
        self.tests.push(test);
        Ok(())
    }

    /// Remove a test by name and hand it back.
    ///
    /// ## Errors
    /// [`CtestError::NotFound`] if no such test is registered.
    pub fn unregister(&mut self, name: &str) -> CtestResult<TestDefinition> {
        let idx = self.position(name).ok_or_else(|| not_found(name))?;
        tracing::debug!(test = name, "unregistered test");
        Ok(self.tests.remove(idx))
    }

    pub fn lookup(&self, name: &str) -> CtestResult<&TestDefinition> {
        self.tests
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| not_found(name))
    }

    pub fn lookup_mut(&mut self, name: &str) -> CtestResult<&mut TestDefinition> {
        self.tests
            .iter_mut()
            .find(|t| t.name() == name)
            .ok_or_else(|| not_found(name))
    }

    /// Modify an existing test's properties as one step.
    ///
    /// The mutator works on a copy of the test's [`PropertyBag`]. If it fails, the registered test is left
    /// exactly as it was and the mutator's error is returned; if it succeeds, the copy replaces the original
    /// in the same position.
    ///
    /// ## Errors
    /// [`CtestError::NotFound`] (converted into `E`) if the test is absent, or whatever the mutator returns.
    ///
    /// ## Examples
    /// ```rust
    /// use ctestkit::{CtestError, TestDefinition, TestRegistry};
    ///
    /// let mut registry = TestRegistry::new();
    /// registry.register(TestDefinition::new("a", ["true"]).unwrap()).unwrap();
    /// registry
    ///     .replace("a", |props| {
    ///         props.set("TIMEOUT", "30");
    ///         Ok::<(), CtestError>(())
    ///     })
    ///     .unwrap();
    /// assert_eq!(registry.lookup("a").unwrap().property("TIMEOUT").unwrap(), "30");
    /// ```
    pub fn replace<F, E>(&mut self, name: &str, mutator: F) -> Result<(), E>
    where
        F: FnOnce(&mut PropertyBag) -> Result<(), E>,
        E: From<CtestError>,
    {
        let idx = self.position(name).ok_or_else(|| not_found(name))?;
        let mut properties = self.tests[idx].properties().clone();
        mutator(&mut properties)?;
        properties.validate(name)?;
        *self.tests[idx].properties_mut() = properties;
        tracing::debug!(test = name, "replaced test properties");
        Ok(())
    }

    /// Check every registered test's properties, including edits made through [`lookup_mut`](Self::lookup_mut).
    pub fn validate(&self) -> CtestResult<()> {
        self.tests.iter().try_for_each(|t| t.properties().validate(t.name()))
    }

    /// Read-only view of every test in registration order.
    pub fn all(&self) -> &[TestDefinition] {
        &self.tests
    }

    pub fn iter(&self) -> impl Iterator<Item = &TestDefinition> {
        self.tests.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tests.iter().map(TestDefinition::name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}

fn not_found(name: &str) -> CtestError {
    CtestError::NotFound {
        name: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test(name: &str) -> TestDefinition {
        TestDefinition::new(name, ["echo", name]).unwrap()
    }

    fn names(registry: &TestRegistry) -> Vec<&str> {
        registry.names().collect()
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = TestRegistry::new();
        let original = TestDefinition::with_properties("a", ["ls", "/tmp"], [("TIMEOUT", "5")]).unwrap();
        registry.register(original.clone()).unwrap();
        assert_eq!(registry.lookup("a").unwrap(), &original);
    }

    #[test]
    fn test_duplicate_rejected_and_size_unchanged() {
        let mut registry = TestRegistry::new();
        registry.register(test("a")).unwrap();
        let err = registry.register(test("a")).unwrap_err();
        assert!(matches!(err, CtestError::DuplicateName { ref name } if name == "a"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unregister_missing() {
        let mut registry = TestRegistry::new();
        assert!(matches!(
            registry.unregister("nope"),
            Err(CtestError::NotFound { .. })
        ));
        assert!(registry.lookup("nope").is_err());
    }

    #[test]
    fn test_unregister_keeps_order() {
        let mut registry = TestRegistry::new();
        for name in ["a", "b", "c", "d"] {
            registry.register(test(name)).unwrap();
        }
        let removed = registry.unregister("b").unwrap();
        assert_eq!(removed.name(), "b");
        assert_eq!(names(&registry), vec!["a", "c", "d"]);
    }

    #[test]
    fn test_remove_then_add_appends_without_reordering() {
        let mut registry = TestRegistry::new();
        for name in ["a", "b", "c"] {
            registry.register(test(name)).unwrap();
        }
        let mut b = registry.unregister("b").unwrap();
        b.set_property("TIMEOUT", "60");
        registry.register(b).unwrap();
        assert_eq!(names(&registry), vec!["a", "c", "b"]);
        assert_eq!(registry.lookup("b").unwrap().property("TIMEOUT").unwrap(), "60");
    }

    #[test]
    fn test_replace_success_keeps_position() {
        let mut registry = TestRegistry::new();
        for name in ["a", "b", "c"] {
            registry.register(test(name)).unwrap();
        }
        registry
            .replace("b", |props| {
                props.set("LABELS", "slow");
                Ok::<(), CtestError>(())
            })
            .unwrap();
        assert_eq!(names(&registry), vec!["a", "b", "c"]);
        assert_eq!(registry.lookup("b").unwrap().property("LABELS").unwrap(), "slow");
    }

    #[test]
    fn test_replace_failure_restores_original() {
        let mut registry = TestRegistry::new();
        let original = TestDefinition::with_properties("a", ["true"], [("TIMEOUT", "5")]).unwrap();
        registry.register(original.clone()).unwrap();

        let result = registry.replace("a", |props| {
            props.set("TIMEOUT", "999");
            props.set("LABELS", "half-done");
            Err(CtestError::validation("mutator gave up"))
        });

        assert!(matches!(result, Err(CtestError::Validation(ref m)) if m == "mutator gave up"));
        assert_eq!(registry.lookup("a").unwrap(), &original);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_replace_missing() {
        let mut registry = TestRegistry::new();
        let result = registry.replace("ghost", |_| Ok::<(), CtestError>(()));
        assert!(matches!(result, Err(CtestError::NotFound { .. })));
    }

    #[test]
    fn test_lookup_mut() {
        let mut registry = TestRegistry::new();
        registry.register(test("a")).unwrap();
        registry.lookup_mut("a").unwrap().set_command(["true"]).unwrap();
        assert_eq!(registry.lookup("a").unwrap().command(), ["true"]);
    }

    #[test]
    fn test_replace_rejects_empty_property_name() {
        let mut registry = TestRegistry::new();
        registry.register(test("a")).unwrap();
        let result = registry.replace("a", |props| {
            props.set("", "x");
            Ok::<(), CtestError>(())
        });
        assert!(matches!(result, Err(CtestError::Validation(_))));
        assert!(registry.lookup("a").unwrap().properties().is_empty());
    }

    #[test]
    fn test_validate_sees_lookup_mut_edits() {
        let mut registry = TestRegistry::new();
        registry.register(test("a")).unwrap();
        registry.validate().unwrap();
        registry.lookup_mut("a").unwrap().set_property("", "x");
        assert!(matches!(registry.validate(), Err(CtestError::Validation(_))));
    }
}
