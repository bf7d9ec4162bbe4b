use std::{fmt::Debug, sync::Arc};

use crate::{
    container::Spezi,
    errors::LaunchError,
    initiator::Initiator,
    lifecycle::LaunchOptions,
    module::{DefaultStandard, Module, Standard},
    notifications::{NoopPlatform, NotificationPlatform},
    types::{Instance, ModuleId, SharedValues},
};

/// Declares the modules an application is composed of
///
/// Launching consists of three parts:
/// 1. The configuration, where the standard, all modules and shared values are registered
/// 2. The resolution, ordering the modules and injecting their dependencies
/// 3. Configuring every module in resolution order, which yields the [`Spezi`] container
pub struct Configuration {
    /// The standard, always the first module
    pub(crate) standard: Instance,
    /// Modules in configured order
    pub(crate) modules: Vec<Instance>,
    pub(crate) shared: SharedValues,
    pub(crate) launch_options: LaunchOptions,
    pub(crate) platform: Arc<dyn NotificationPlatform>,
}
impl Debug for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Configuration")
            .field("standard", &self.standard.id().type_name)
            .field(
                "modules",
                &self.modules.iter().map(|m| m.id().type_name).collect::<Vec<_>>(),
            )
            .field("shared", &self.shared)
            .finish()
    }
}
impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

impl Configuration {
    /// A configuration using the [`DefaultStandard`]
    pub fn new() -> Self {
        Self::with_standard(DefaultStandard)
    }

    pub fn with_standard<S: Standard>(standard: S) -> Self {
        Configuration {
            standard: Instance::new(standard),
            modules: Vec::new(),
            shared: SharedValues::default(),
            launch_options: LaunchOptions::default(),
            platform: Arc::new(NoopPlatform),
        }
    }
}

impl Configuration {
    pub fn module<M: Module>(mut self, module: M) -> Self {
        if self.modules.iter().any(|m| m.id() == ModuleId::of::<M>()) {
            tracing::warn!(
                "'{}' is configured more than once, lookups use the first",
                std::any::type_name::<M>()
            );
        }
        self.modules.push(Instance::new(module));
        self
    }

    /// Adds the module if there is one
    pub fn maybe_module<M: Module>(self, module: Option<M>) -> Self {
        match module {
            Some(module) => self.module(module),
            None => self,
        }
    }

    /// Registers a value every module can read while it is configured
    pub fn with_shared<T: Send + Sync + 'static>(mut self, value: T) -> Self {
        if self.shared.insert(value) {
            tracing::warn!(
                "Shared value '{}' was registered twice, keeping the last",
                std::any::type_name::<T>()
            );
        }
        self
    }

    pub fn launch_options(mut self, options: LaunchOptions) -> Self {
        self.launch_options = options;
        self
    }

    pub fn notification_platform(mut self, platform: impl NotificationPlatform + 'static) -> Self {
        self.platform = Arc::new(platform);
        self
    }

    /// Resolves and configures all modules
    ///
    /// Fails before any module is configured if the module graph has a cycle
    /// or an unmet requirement.
    pub fn launch(self) -> Result<Spezi, LaunchError> {
        Initiator::new(self).launch()
    }
}
