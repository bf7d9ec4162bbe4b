use std::{any::type_name, ops::Deref, sync::Arc};

use spezi::{Application, ApplicationError, ApplicationValue, Configuration};

use crate::{errors::ConfigError, provider::ConfigProvider};

/// A wrapper type to read configs while a module is configured
///
/// The [`ConfigProvider`] is registered as a shared value on the configuration,
/// modules then resolve the configs they need from the application.
///
/// # Example
/// ```rust
/// use spezi::{Application, Configuration, DynError, Module};
/// use spezi_config::{Config, ConfigProvider, ConfigurationExt};
///
/// pub struct UploadConfig {
///     enabled: bool,
/// }
///
/// struct Upload;
/// impl Module for Upload {
///     fn configure(&self, app: &Application<'_>) -> Result<(), DynError> {
///         let config = app.resolve::<Config<UploadConfig>>()?;
///         assert!(config.enabled);
///         Ok(())
///     }
/// }
///
/// let mut provider = ConfigProvider::new();
/// provider.add_config(UploadConfig { enabled: true }).unwrap();
///
/// Configuration::new()
///     .with_config_provider(provider)
///     .module(Upload)
///     .launch()
///     .unwrap();
/// ```
pub struct Config<T> {
    inner: Arc<T>,
}
impl<T> Deref for Config<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
impl<T> Clone for Config<T> {
    fn clone(&self) -> Self {
        Config {
            inner: self.inner.clone(),
        }
    }
}
impl<T> Config<T> {
    pub fn inner(&self) -> Arc<T> {
        self.inner.clone()
    }

    pub fn into_inner(self) -> Arc<T> {
        self.inner
    }
}

impl<T: Send + Sync + 'static> ApplicationValue for Config<T> {
    fn resolve(app: &Application<'_>) -> Result<Self, ApplicationError> {
        let config_name = type_name::<T>();
        let config_provider = app
            .shared::<ConfigProvider>()
            .ok_or(ApplicationError::ValueMissing(type_name::<ConfigProvider>()))?;

        let config: Arc<T> = config_provider.require_config().map_err(|e| match e {
            ConfigError::Missing(name) => ApplicationError::ValueMissing(name),
            other => ApplicationError::Other(Arc::new(Box::new(other))),
        })?;

        tracing::debug!(parent: app.logger(), "Resolved config '{config_name}'");
        Ok(Config { inner: config })
    }
}

/// Registers a [`ConfigProvider`] on a [`Configuration`]
pub trait ConfigurationExt {
    fn with_config_provider(self, provider: ConfigProvider) -> Self;
}
impl ConfigurationExt for Configuration {
    fn with_config_provider(self, provider: ConfigProvider) -> Self {
        self.with_shared(provider)
    }
}
