use std::sync::Arc;

use tracing::Span;

use crate::{
    errors::ApplicationError,
    lifecycle::LaunchOptions,
    module::Module,
    notifications::RemoteNotifications,
    types::{Instance, ModuleId, SharedValues},
};

/// Access to the application a module is configured in
///
/// Passed to [`Module::configure`]. Everything here is shared by all modules
/// and never goes through the dependency graph.
pub struct Application<'a> {
    pub(crate) module: ModuleId,
    pub(crate) span: &'a Span,
    pub(crate) modules: &'a [Instance],
    pub(crate) shared: &'a SharedValues,
    pub(crate) notifications: &'a Arc<RemoteNotifications>,
    pub(crate) launch_options: &'a LaunchOptions,
}

impl Application<'_> {
    /// The module being configured
    pub fn module_id(&self) -> ModuleId {
        self.module
    }

    /// Span scoped to the module being configured
    pub fn logger(&self) -> &Span {
        self.span
    }

    /// Looks up another resolved module
    pub fn module<T: Module>(&self) -> Option<Arc<T>> {
        self.modules
            .iter()
            .find_map(|instance| instance.downcast::<T>().ok())
    }

    /// A value registered with [`Configuration::with_shared`](crate::Configuration::with_shared)
    pub fn shared<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.shared.get()
    }

    pub fn remote_notifications(&self) -> &Arc<RemoteNotifications> {
        self.notifications
    }

    pub fn launch_options(&self) -> &LaunchOptions {
        self.launch_options
    }

    /// Resolves an [`ApplicationValue`]
    pub fn resolve<V: ApplicationValue>(&self) -> Result<V, ApplicationError> {
        V::resolve(self)
    }
}

/// A value a module can obtain from the [`Application`] while it is configured
pub trait ApplicationValue: Sized {
    fn resolve(app: &Application<'_>) -> Result<Self, ApplicationError>;
}

impl ApplicationValue for Span {
    fn resolve(app: &Application<'_>) -> Result<Self, ApplicationError> {
        Ok(app.span.clone())
    }
}

impl ApplicationValue for Arc<RemoteNotifications> {
    fn resolve(app: &Application<'_>) -> Result<Self, ApplicationError> {
        Ok(app.notifications.clone())
    }
}

impl ApplicationValue for LaunchOptions {
    fn resolve(app: &Application<'_>) -> Result<Self, ApplicationError> {
        Ok(app.launch_options.clone())
    }
}
