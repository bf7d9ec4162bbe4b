//! Dependency declarations
//!
//! A module lists its declarations through [`Module::dependencies`]. During a
//! resolution run the [`DependencyManager`] first asks every declaration to
//! [`collect`](DependencyDeclaration::collect) its requirement and, once the
//! whole graph is ordered, to [`inject`](DependencyDeclaration::inject) the
//! resolved instance into its slot.

use std::sync::{Arc, OnceLock};

use crate::{
    errors::DependencyError,
    manager::DependencyManager,
    module::Module,
    types::{Instance, ModuleId},
};

pub mod collection;
pub mod single;

/// One declared requirement of a module, or a group of them
pub trait DependencyDeclaration: Send + Sync {
    /// Registers the requirement with the manager
    fn collect(&self, manager: &mut DependencyManager);

    /// Binds the resolved instance, or its absence
    ///
    /// Must be called exactly once per resolution run.
    fn inject(&self, manager: &DependencyManager) -> Result<(), DependencyError>;

    /// The injected modules, in declaration order
    fn resolved(&self) -> Result<Vec<Instance>, DependencyError>;
}
impl<D: DependencyDeclaration + ?Sized> DependencyDeclaration for Box<D> {
    fn collect(&self, manager: &mut DependencyManager) {
        (**self).collect(manager)
    }

    fn inject(&self, manager: &DependencyManager) -> Result<(), DependencyError> {
        (**self).inject(manager)
    }

    fn resolved(&self) -> Result<Vec<Instance>, DependencyError> {
        (**self).resolved()
    }
}

/// State of a dependency slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Not injected yet
    Unresolved,
    /// Holds an instance
    Resolved,
    /// Injected, but nothing was available
    Absent,
}

/// Write-once storage for an injected dependency
pub(crate) struct Slot<T> {
    target: ModuleId,
    value: OnceLock<Option<Arc<T>>>,
}
impl<T: Module> Slot<T> {
    pub(crate) fn new() -> Self {
        Slot {
            target: ModuleId::of::<T>(),
            value: OnceLock::new(),
        }
    }

    pub(crate) fn target(&self) -> ModuleId {
        self.target
    }

    pub(crate) fn set(&self, value: Option<Arc<T>>) -> Result<(), DependencyError> {
        self.value
            .set(value)
            .map_err(|_| DependencyError::AlreadyInjected(self.target))
    }

    pub(crate) fn get(&self) -> Result<Option<&Arc<T>>, DependencyError> {
        self.value
            .get()
            .map(Option::as_ref)
            .ok_or(DependencyError::NotInjected(self.target))
    }

    pub(crate) fn ensure_unset(&self) -> Result<(), DependencyError> {
        match self.value.get() {
            Some(_) => Err(DependencyError::AlreadyInjected(self.target)),
            None => Ok(()),
        }
    }

    pub(crate) fn state(&self) -> SlotState {
        match self.value.get() {
            None => SlotState::Unresolved,
            Some(Some(_)) => SlotState::Resolved,
            Some(None) => SlotState::Absent,
        }
    }

    pub(crate) fn resolved(&self) -> Result<Vec<Instance>, DependencyError> {
        let value = self.get()?;
        Ok(value.into_iter().cloned().map(Instance::from_arc).collect())
    }
}
