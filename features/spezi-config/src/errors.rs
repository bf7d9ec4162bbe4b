/// Errors when registering or retrieving a config
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A config of this type is already registered
    #[error("The config type '{0}' is already registered")]
    AlreadyRegistered(&'static str),
    /// No config of this type is registered
    #[error("The config type '{0}' is not known")]
    Missing(&'static str),
    /// The stored config did not have the requested type
    #[error("The config stored for '{0}' has a different type")]
    DowncastFailed(&'static str),
}
