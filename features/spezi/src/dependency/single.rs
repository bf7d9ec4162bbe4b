use std::{any::type_name, fmt::Debug, ops::Deref, sync::Arc};

use crate::{
    dependency::{DependencyDeclaration, Slot, SlotState},
    errors::DependencyError,
    factories::DefaultFactory,
    manager::DependencyManager,
    module::Module,
    types::{Instance, ModuleId},
};

enum Source<T> {
    /// Search the configured modules, optionally falling back to a default
    Search { default: Option<DefaultFactory> },
    /// Always load this exact instance
    Load { module: Arc<T>, instance: Instance },
}

/// Dependency on exactly one module of type `T`
///
/// Should only be accessed after the container was launched.
///
/// ### Panics
///
/// [`Dependency::get`] and `Deref` panic if accessed before injection, use
/// [`Dependency::try_get`] to check instead.
pub struct Dependency<T: Module> {
    source: Source<T>,
    slot: Slot<T>,
}
impl<T: Module> Debug for Dependency<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.source {
            Source::Search { default: None } => "required",
            Source::Search { default: Some(_) } => "default",
            Source::Load { .. } => "load",
        };
        f.debug_struct("Dependency")
            .field("target", &type_name::<T>())
            .field("kind", &kind)
            .field("state", &self.slot.state())
            .finish()
    }
}
impl<T: Module> Deref for Dependency<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.get()
    }
}

impl<T: Module> Dependency<T> {
    /// A `T` must be configured, launching fails otherwise
    pub fn required() -> Self {
        Self::search(None)
    }

    /// Uses the configured `T`, or creates one with `default` if there is none
    pub fn with_default(default: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self::search(Some(DefaultFactory::new(default)))
    }

    /// Adds `module` itself to the application and injects exactly it
    pub fn load(module: T) -> Self {
        let module = Arc::new(module);
        Dependency {
            source: Source::Load {
                instance: Instance::from_arc(module.clone()),
                module,
            },
            slot: Slot::new(),
        }
    }

    fn search(default: Option<DefaultFactory>) -> Self {
        Dependency {
            source: Source::Search { default },
            slot: Slot::new(),
        }
    }

    /// Accesses the dependency
    ///
    /// # Panics
    /// - When accessed before the dependency was injected
    pub fn get(&self) -> &Arc<T> {
        match self.try_get() {
            Ok(module) => module,
            Err(err) => panic!("{err}"),
        }
    }

    /// Tries to access the dependency
    pub fn try_get(&self) -> Result<&Arc<T>, DependencyError> {
        self.slot
            .get()?
            .ok_or(DependencyError::NotInjected(self.slot.target()))
    }

    pub fn state(&self) -> SlotState {
        self.slot.state()
    }
}

impl<T: Module> DependencyDeclaration for Dependency<T> {
    fn collect(&self, manager: &mut DependencyManager) {
        match &self.source {
            Source::Search { default } => manager.require(ModuleId::of::<T>(), default.clone()),
            Source::Load { instance, .. } => manager.load(instance.clone()),
        }
    }

    fn inject(&self, manager: &DependencyManager) -> Result<(), DependencyError> {
        self.slot.ensure_unset()?;
        let owner = manager.injecting()?;

        let module = match &self.source {
            Source::Search { .. } => {
                let target = ModuleId::of::<T>();
                let instance = manager
                    .retrieve(target)
                    .ok_or_else(|| manager.missing(owner, target))?;
                downcast::<T>(instance)?
            }
            Source::Load { module, instance } => {
                manager
                    .retrieve_instance(instance)
                    .ok_or_else(|| manager.missing(owner, instance.id()))?;
                module.clone()
            }
        };

        self.slot.set(Some(module))
    }

    fn resolved(&self) -> Result<Vec<Instance>, DependencyError> {
        self.slot.resolved()
    }
}

/// Dependency on a module of type `T` which may be absent
///
/// Absence is only known after injection, reading earlier panics in
/// [`OptionalDependency::get`].
pub struct OptionalDependency<T: Module> {
    slot: Slot<T>,
}
impl<T: Module> Debug for OptionalDependency<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionalDependency")
            .field("target", &type_name::<T>())
            .field("state", &self.slot.state())
            .finish()
    }
}
impl<T: Module> Default for OptionalDependency<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Module> OptionalDependency<T> {
    pub fn new() -> Self {
        OptionalDependency { slot: Slot::new() }
    }

    /// Accesses the dependency, `None` if no `T` was configured
    ///
    /// # Panics
    /// - When accessed before the dependency was injected
    pub fn get(&self) -> Option<&Arc<T>> {
        match self.slot.get() {
            Ok(module) => module,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_get(&self) -> Result<Option<&Arc<T>>, DependencyError> {
        self.slot.get()
    }

    pub fn state(&self) -> SlotState {
        self.slot.state()
    }
}

impl<T: Module> DependencyDeclaration for OptionalDependency<T> {
    fn collect(&self, manager: &mut DependencyManager) {
        manager.request_optional(ModuleId::of::<T>());
    }

    fn inject(&self, manager: &DependencyManager) -> Result<(), DependencyError> {
        self.slot.ensure_unset()?;
        manager.injecting()?;

        // Only modules resolved before the owner count, a later one was absent
        // when the owner was ordered
        let module = manager
            .retrieve(ModuleId::of::<T>())
            .map(downcast::<T>)
            .transpose()?;

        self.slot.set(module)
    }

    fn resolved(&self) -> Result<Vec<Instance>, DependencyError> {
        self.slot.resolved()
    }
}

fn downcast<T: Module>(instance: &Instance) -> Result<Arc<T>, DependencyError> {
    instance
        .downcast::<T>()
        .map_err(|actual| DependencyError::DowncastFailed {
            required: type_name::<T>(),
            actual,
        })
}
