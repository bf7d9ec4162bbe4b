use std::sync::Arc;

use thiserror::Error;

use crate::types::{DynError, ModuleId};

/// Errors of a resolution run and of reading dependency slots
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DependencyError {
    /// The declared dependencies form a closed loop
    #[error("A dependency cycle exists between your modules: {chain}")]
    Cycle { chain: ModuleChain },
    /// A required module is neither configured nor has a default
    #[error("'{required_by}' requires '{dependency}' but it was not configured and has no default")]
    MissingDependency {
        required_by: ModuleId,
        dependency: ModuleId,
    },
    /// The slot was read before the injection pass reached it
    #[error("Dependency on '{0}' was accessed before it was injected")]
    NotInjected(ModuleId),
    /// The slot already holds a value
    #[error("Dependency on '{0}' was already injected")]
    AlreadyInjected(ModuleId),
    /// A declaration was injected while no module's declarations were being injected
    #[error("Dependencies can only be injected during a resolution run")]
    OutsideInjection,

    #[error("Failed to downcast, required: '{required}' actual: '{actual}'")]
    DowncastFailed {
        required: &'static str,
        actual: &'static str,
    },
}

/// Ordered chain of modules, as found on the search stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleChain(pub Vec<ModuleId>);
impl ModuleChain {
    pub fn contains(&self, id: &ModuleId) -> bool {
        self.0.contains(id)
    }

    pub fn ids(&self) -> &[ModuleId] {
        &self.0
    }
}
impl std::fmt::Display for ModuleChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.0.iter().map(|id| id.type_name).collect();
        f.write_str(&names.join(" -> "))
    }
}

/// Errors while launching the container
#[derive(Error, Debug, Clone)]
pub enum LaunchError {
    /// The module graph could not be resolved
    #[error(transparent)]
    Dependency(#[from] DependencyError),
    /// A module failed in `configure`
    #[error("Configuring '{module}' failed - error: {error}")]
    ConfigureFailed {
        module: ModuleId,
        error: Arc<DynError>,
    },
}

/// Errors when resolving an application value
#[derive(Error, Debug, Clone)]
pub enum ApplicationError {
    /// The requested value is not available
    #[error("The application value '{0}' is not available")]
    ValueMissing(&'static str),
    /// Generic error while resolving
    #[error("Error while resolving an application value: {0}")]
    Other(Arc<DynError>),
}

/// Errors of a remote notification registration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// Superseded by a newer registration, or the helper was dropped
    #[error("The remote notification registration was cancelled")]
    Cancelled,
    /// The platform reported a failure
    #[error("Registering for remote notifications failed: {0}")]
    Failed(String),
}
