use crate::{lifecycle::LifecycleHandler, module::Module, notifications::NotificationHandler};

/// A capability modules may opt into
///
/// Used with [`Spezi::modules_conforming`](crate::Spezi::modules_conforming)
/// to select the modules which support it.
pub trait Capability: 'static {
    type Object<'a>: ?Sized + 'a;

    /// The capability view of `module`, if it supports it
    fn project<'a>(module: &'a dyn Module) -> Option<&'a Self::Object<'a>>;
}

/// Modules receiving lifecycle events
pub struct LifecycleHandling;
impl Capability for LifecycleHandling {
    type Object<'a> = dyn LifecycleHandler + 'a;

    fn project<'a>(module: &'a dyn Module) -> Option<&'a Self::Object<'a>> {
        module.as_lifecycle_handler()
    }
}

/// Modules receiving notifications
pub struct NotificationHandling;
impl Capability for NotificationHandling {
    type Object<'a> = dyn NotificationHandler + 'a;

    fn project<'a>(module: &'a dyn Module) -> Option<&'a Self::Object<'a>> {
        module.as_notification_handler()
    }
}

/// Modules exposed in the environment
pub struct EnvironmentAccess;
impl Capability for EnvironmentAccess {
    type Object<'a> = dyn Module;

    fn project<'a>(module: &'a dyn Module) -> Option<&'a Self::Object<'a>> {
        module.is_environment_accessible().then_some(module)
    }
}
