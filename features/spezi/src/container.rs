use std::{fmt::Debug, sync::Arc};

use futures::future::join_all;

use crate::{
    capability::{Capability, LifecycleHandling, NotificationHandling},
    environment::Environment,
    lifecycle::{LaunchOptions, LifecycleEvent},
    module::{Module, Standard},
    notifications::{
        combine_fetch_results, BackgroundFetchResult, Notification, NotificationResponse,
        PresentationOptions, RemoteNotifications, RemotePayload,
    },
    types::{Instance, ModuleId, SharedValues},
};

/// Container holding all launched modules
///
/// Immutable once launched and cheap to clone, so it can be read from any thread.
#[derive(Clone)]
pub struct Spezi(Arc<SpeziInner>);
struct SpeziInner {
    standard: Instance,
    /// Modules in resolution order
    modules: Vec<Instance>,
    shared: SharedValues,
    environment: Environment,
    notifications: Arc<RemoteNotifications>,
    launch_options: LaunchOptions,
}
impl Debug for Spezi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.0.modules.iter().map(|m| m.id().type_name).collect();
        f.debug_struct("Spezi")
            .field("standard", &self.0.standard.id().type_name)
            .field("modules", &names)
            .field("environment", &self.0.environment)
            .finish()
    }
}

impl Spezi {
    pub(crate) fn new(
        standard: Instance,
        modules: Vec<Instance>,
        shared: SharedValues,
        environment: Environment,
        notifications: Arc<RemoteNotifications>,
        launch_options: LaunchOptions,
    ) -> Self {
        Self(Arc::new(SpeziInner {
            standard,
            modules,
            shared,
            environment,
            notifications,
            launch_options,
        }))
    }

    /// All modules, dependencies before their dependents
    pub fn modules(&self) -> &[Instance] {
        &self.0.modules
    }

    pub fn module_ids(&self) -> Vec<ModuleId> {
        self.0.modules.iter().map(Instance::id).collect()
    }

    /// The first module of type `T`
    pub fn module<T: Module>(&self) -> Option<Arc<T>> {
        self.0
            .modules
            .iter()
            .find_map(|instance| instance.downcast::<T>().ok())
    }

    /// The standard, if it is an `S`
    pub fn standard<S: Standard>(&self) -> Option<Arc<S>> {
        self.0.standard.downcast().ok()
    }

    /// Every module supporting the capability `C`, in resolution order
    pub fn modules_conforming<C: Capability>(&self) -> Vec<&C::Object<'_>> {
        self.0
            .modules
            .iter()
            .filter_map(|instance| C::project(instance.module().as_ref()))
            .collect()
    }

    pub fn environment(&self) -> &Environment {
        &self.0.environment
    }

    pub fn shared<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.0.shared.get()
    }

    pub fn remote_notifications(&self) -> &Arc<RemoteNotifications> {
        &self.0.notifications
    }

    pub fn launch_options(&self) -> &LaunchOptions {
        &self.0.launch_options
    }
}

// Lifecycle forwarding
impl Spezi {
    /// Forwards `event` to every lifecycle handler in resolution order
    pub fn handle_lifecycle_event(&self, event: &LifecycleEvent) {
        let handlers = self.modules_conforming::<LifecycleHandling>();
        tracing::debug!("Forwarding {event:?} to {} handlers", handlers.len());

        for handler in handlers {
            event.dispatch(handler);
        }
    }

    /// Forwards the launch options the container was configured with
    pub fn will_finish_launching(&self) {
        let event = LifecycleEvent::WillFinishLaunching(self.0.launch_options.clone());
        self.handle_lifecycle_event(&event);
    }
}

// Notification forwarding
impl Spezi {
    pub async fn handle_notification_action(&self, response: &NotificationResponse) {
        let handlers = self.modules_conforming::<NotificationHandling>();
        tracing::debug!(
            "Forwarding action '{}' to {} handlers",
            response.action_identifier,
            handlers.len()
        );

        join_all(
            handlers
                .into_iter()
                .map(|handler| handler.handle_notification_action(response)),
        )
        .await;
    }

    /// `None` if no handler had an opinion, the union of all answers otherwise
    pub async fn receive_incoming_notification(
        &self,
        notification: &Notification,
    ) -> Option<PresentationOptions> {
        let handlers = self.modules_conforming::<NotificationHandling>();

        join_all(
            handlers
                .into_iter()
                .map(|handler| handler.receive_incoming_notification(notification)),
        )
        .await
        .into_iter()
        .flatten()
        .reduce(PresentationOptions::union)
    }

    pub async fn receive_remote_notification(&self, payload: &RemotePayload) -> BackgroundFetchResult {
        let handlers = self.modules_conforming::<NotificationHandling>();

        let results = join_all(
            handlers
                .into_iter()
                .map(|handler| handler.receive_remote_notification(payload)),
        )
        .await;

        combine_fetch_results(results)
    }
}
