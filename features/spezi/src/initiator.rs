use std::sync::Arc;

use crate::{
    application::Application,
    builder::Configuration,
    capability::{Capability, EnvironmentAccess},
    container::Spezi,
    environment::Environment,
    errors::LaunchError,
    manager::DependencyManager,
    notifications::RemoteNotifications,
};

/// Launches a [`Configuration`] into a [`Spezi`] container
pub(crate) struct Initiator {
    configuration: Configuration,
}

impl Initiator {
    pub(crate) fn new(configuration: Configuration) -> Initiator {
        Initiator { configuration }
    }

    pub(crate) fn launch(self) -> Result<Spezi, LaunchError> {
        let Configuration {
            standard,
            modules,
            shared,
            launch_options,
            platform,
        } = self.configuration;

        tracing::info!(
            "Launching application with standard '{}', {} modules and {} shared values",
            standard.id(),
            modules.len(),
            shared.len()
        );

        // Standard first, then the modules in configured order
        let mut configured = Vec::with_capacity(modules.len() + 1);
        configured.push(standard.clone());
        configured.extend(modules);

        let mut manager = DependencyManager::new(configured);
        manager.resolve()?;
        let modules = manager.into_modules();

        let notifications = Arc::new(RemoteNotifications::new(platform));

        for instance in &modules {
            let span = tracing::info_span!("module", name = instance.id().type_name);
            let app = Application {
                module: instance.id(),
                span: &span,
                modules: &modules,
                shared: &shared,
                notifications: &notifications,
                launch_options: &launch_options,
            };

            span.in_scope(|| instance.module().configure(&app))
                .map_err(|error| {
                    tracing::error!("Configuring '{}' failed: {error}", instance.id());
                    LaunchError::ConfigureFailed {
                        module: instance.id(),
                        error: Arc::new(error),
                    }
                })?;

            tracing::debug!("Configured '{}'", instance.id());
        }

        let environment = Environment::new(
            modules
                .iter()
                .filter(|instance| EnvironmentAccess::project(instance.module().as_ref()).is_some()),
        );

        tracing::info!(
            "Application launched with {} modules, {} environment accessible",
            modules.len(),
            environment.len()
        );

        Ok(Spezi::new(
            standard,
            modules,
            shared,
            environment,
            notifications,
            launch_options,
        ))
    }
}
