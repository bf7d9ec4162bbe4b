use std::{fmt::Debug, sync::Arc};

use crate::{
    dependency::{single::Dependency, DependencyDeclaration},
    errors::DependencyError,
    manager::DependencyManager,
    module::Module,
    types::Instance,
};

/// Ordered, composable group of dependency declarations
///
/// All composition operators keep the relative order of entries, which is the
/// order the entries are resolved in.
///
/// ```rust
/// use spezi::{Dependency, DependencyCollection, Module};
///
/// struct StepCounter;
/// impl Module for StepCounter {}
///
/// struct HeartRate;
/// impl Module for HeartRate {}
///
/// let track_heart_rate = true;
/// let sources = DependencyCollection::new()
///     .module(|| StepCounter)
///     .when(track_heart_rate, |c| c.with(Dependency::with_default(|| HeartRate)));
/// assert_eq!(sources.len(), 2);
/// ```
#[derive(Default)]
pub struct DependencyCollection {
    entries: Vec<Box<dyn DependencyDeclaration>>,
}
impl Debug for DependencyCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyCollection")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl DependencyCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a single declaration
    pub fn with(mut self, declaration: impl DependencyDeclaration + 'static) -> Self {
        self.entries.push(Box::new(declaration));
        self
    }

    /// Appends a dependency on `M`, created with `default` if it is not configured
    pub fn module<M: Module>(self, default: impl Fn() -> M + Send + Sync + 'static) -> Self {
        self.with(Dependency::with_default(default))
    }

    /// Appends all entries of `other`
    pub fn append(mut self, other: DependencyCollection) -> Self {
        self.entries.extend(other.entries);
        self
    }

    /// Appends the entries built by `build` only if `condition` holds
    pub fn when(
        self,
        condition: bool,
        build: impl FnOnce(DependencyCollection) -> DependencyCollection,
    ) -> Self {
        if condition {
            self.append(build(DependencyCollection::new()))
        } else {
            self
        }
    }

    /// Appends the entries of `first` if `condition` holds, those of `second` otherwise
    pub fn either(
        self,
        condition: bool,
        first: impl FnOnce(DependencyCollection) -> DependencyCollection,
        second: impl FnOnce(DependencyCollection) -> DependencyCollection,
    ) -> Self {
        let branch = match condition {
            true => first(DependencyCollection::new()),
            false => second(DependencyCollection::new()),
        };
        self.append(branch)
    }

    /// Appends the declaration if there is one
    pub fn optional(self, declaration: Option<impl DependencyDeclaration + 'static>) -> Self {
        match declaration {
            Some(declaration) => self.with(declaration),
            None => self,
        }
    }

    /// Appends every collection in iteration order
    pub fn flatten(self, collections: impl IntoIterator<Item = DependencyCollection>) -> Self {
        collections.into_iter().fold(self, Self::append)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All injected modules, in declaration order
    ///
    /// # Panics
    /// - When accessed before the collection was injected
    pub fn modules(&self) -> Vec<Instance> {
        match self.try_modules() {
            Ok(modules) => modules,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_modules(&self) -> Result<Vec<Instance>, DependencyError> {
        self.resolved()
    }

    /// The first injected module of type `T`
    pub fn find<T: Module>(&self) -> Option<Arc<T>> {
        self.try_modules()
            .ok()?
            .iter()
            .find_map(|instance| instance.downcast::<T>().ok())
    }
}

impl DependencyDeclaration for DependencyCollection {
    fn collect(&self, manager: &mut DependencyManager) {
        for entry in &self.entries {
            entry.collect(manager);
        }
    }

    fn inject(&self, manager: &DependencyManager) -> Result<(), DependencyError> {
        self.entries
            .iter()
            .try_for_each(|entry| entry.inject(manager))
    }

    fn resolved(&self) -> Result<Vec<Instance>, DependencyError> {
        let mut modules = Vec::new();
        for entry in &self.entries {
            modules.extend(entry.resolved()?);
        }
        Ok(modules)
    }
}
