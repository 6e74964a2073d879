//! Callbacks run once a synthesized type has been loaded.

use std::fmt;
use std::sync::Arc;

use crate::description::TypeDescription;
use crate::error::Result;

/// Initialization that has to happen after a type is loaded, e.g. populating
/// static fields with values that cannot be expressed as constants
pub trait LoadedTypeInitializer: fmt::Debug + Send + Sync {
    fn on_load(&self, loaded: &TypeDescription) -> Result<()>;

    /// Whether `on_load` does anything
    fn is_alive(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoOpInitializer;

impl LoadedTypeInitializer for NoOpInitializer {
    fn on_load(&self, _loaded: &TypeDescription) -> Result<()> {
        Ok(())
    }

    fn is_alive(&self) -> bool {
        false
    }
}

/// Initializers run in order, stopping at the first failure
#[derive(Debug, Clone, Default)]
pub struct CompoundInitializer {
    initializers: Vec<Arc<dyn LoadedTypeInitializer>>,
}

impl CompoundInitializer {
    pub fn new(initializers: Vec<Arc<dyn LoadedTypeInitializer>>) -> Self {
        Self { initializers }
    }

    /// `first` followed by `second`
    pub fn of(first: Arc<dyn LoadedTypeInitializer>, second: Arc<dyn LoadedTypeInitializer>) -> Self {
        Self::new(vec![first, second])
    }

    pub fn len(&self) -> usize {
        self.initializers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.initializers.is_empty()
    }
}

impl LoadedTypeInitializer for CompoundInitializer {
    fn on_load(&self, loaded: &TypeDescription) -> Result<()> {
        self.initializers.iter().try_for_each(|initializer| initializer.on_load(loaded))
    }

    fn is_alive(&self) -> bool {
        self.initializers.iter().any(|initializer| initializer.is_alive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct Recording {
        label: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
        fail: bool,
    }

    impl LoadedTypeInitializer for Recording {
        fn on_load(&self, loaded: &TypeDescription) -> Result<()> {
            self.log.lock().unwrap().push(self.label);
            if self.fail {
                return Err(Error::Initializer { type_name: loaded.name(), message: self.label.to_string() });
            }
            Ok(())
        }

        fn is_alive(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_compound_runs_in_order_and_stops_on_failure() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let compound = CompoundInitializer::new(vec![
            Arc::new(Recording { label: "a", log: log.clone(), fail: false }),
            Arc::new(Recording { label: "b", log: log.clone(), fail: true }),
            Arc::new(Recording { label: "c", log: log.clone(), fail: false }),
        ]);
        assert!(compound.is_alive());
        assert!(compound.on_load(&TypeDescription::class_named("pkg.Foo")).is_err());
        assert_eq!(*log.lock().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_noop_is_not_alive() {
        let compound = CompoundInitializer::of(Arc::new(NoOpInitializer), Arc::new(NoOpInitializer));
        assert!(!compound.is_alive());
    }
}
