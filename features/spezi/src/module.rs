use crate::{
    application::Application,
    dependency::DependencyDeclaration,
    lifecycle::LifecycleHandler,
    notifications::NotificationHandler,
    types::DynError,
};

/// The unit of composition of an application
///
/// A module is configured once, after all of its dependencies were resolved and
/// injected. Modules are shared between threads once the container is launched,
/// so state which changes after `configure` needs interior mutability.
///
/// Capabilities are opted into by overriding the `as_*` hooks:
///
/// ```rust
/// use spezi::{Dependency, DependencyDeclaration, LifecycleHandler, Module};
///
/// struct SecureStorage;
/// impl Module for SecureStorage {}
///
/// struct Account {
///     storage: Dependency<SecureStorage>,
/// }
/// impl Module for Account {
///     fn dependencies(&self) -> Vec<&dyn DependencyDeclaration> {
///         vec![&self.storage]
///     }
///
///     fn as_lifecycle_handler(&self) -> Option<&dyn LifecycleHandler> {
///         Some(self)
///     }
/// }
/// impl LifecycleHandler for Account {}
/// ```
pub trait Module: Send + Sync + 'static {
    /// Every dependency declaration owned by this module, in declaration order
    fn dependencies(&self) -> Vec<&dyn DependencyDeclaration> {
        Vec::new()
    }

    /// Called once, in resolution order, after all dependencies were injected
    fn configure(&self, app: &Application<'_>) -> Result<(), DynError> {
        let _ = app;
        Ok(())
    }

    fn as_lifecycle_handler(&self) -> Option<&dyn LifecycleHandler> {
        None
    }

    fn as_notification_handler(&self) -> Option<&dyn NotificationHandler> {
        None
    }

    /// Exposes the module in the container's [`Environment`](crate::Environment)
    fn is_environment_accessible(&self) -> bool {
        false
    }
}

/// The module every other module can rely on being present
///
/// The standard of a configuration is always its first module.
pub trait Standard: Module {}

/// Standard used when the application does not provide its own
#[derive(Debug, Default)]
pub struct DefaultStandard;
impl Module for DefaultStandard {}
impl Standard for DefaultStandard {}
