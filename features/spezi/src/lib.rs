//! Spezi composes an application out of modules which declare their dependencies
//! on other modules.
//!
//! Launching an application is split into three parts:
//! 1. [`Configuration`]: registers the standard, the modules and shared values
//! 2. [`DependencyManager`]: orders all modules so dependencies come before their
//!    dependents, creates missing modules from their defaults and injects every
//!    declaration
//! 3. [`Spezi`]: the container of all configured modules, which forwards lifecycle
//!    and notification events to the modules supporting them
//!
//! # Examples
//!
//! ```rust
//! use spezi::{Configuration, Dependency, DependencyDeclaration, Module};
//!
//! #[derive(Default)]
//! struct Storage;
//! impl Module for Storage {}
//!
//! struct Account {
//!     storage: Dependency<Storage>,
//! }
//! impl Module for Account {
//!     fn dependencies(&self) -> Vec<&dyn DependencyDeclaration> {
//!         vec![&self.storage]
//!     }
//! }
//!
//! let spezi = Configuration::new()
//!     .module(Account {
//!         storage: Dependency::with_default(Storage::default),
//!     })
//!     .launch()
//!     .unwrap();
//!
//! // Storage was created from the default and resolved before the account
//! let account = spezi.module::<Account>().unwrap();
//! assert!(spezi.module::<Storage>().is_some());
//! let _storage = account.storage.get();
//! ```
//!
//! Spezi consists of the following components:
//!
//! 1. Module - the unit of composition and its capability hooks
//! 2. Dependency - declarations a module owns, single and collections
//! 3. Manager - the resolution engine
//! 4. Builder, Initiator and Container - launching and holding the application
//! 5. Lifecycle and Notifications - events forwarded to capable modules
//! 6. Errors - for resolution, launch and registration errors

pub mod application;
pub mod builder;
pub mod capability;
pub mod container;
pub mod dependency;
pub mod environment;
pub mod errors;
pub mod factories;
mod initiator;
pub mod lifecycle;
pub mod manager;
pub mod module;
pub mod notifications;
pub mod types;

pub use application::{Application, ApplicationValue};
pub use builder::Configuration;
pub use capability::{Capability, EnvironmentAccess, LifecycleHandling, NotificationHandling};
pub use container::Spezi;
pub use dependency::{
    collection::DependencyCollection,
    single::{Dependency, OptionalDependency},
    DependencyDeclaration, SlotState,
};
pub use environment::Environment;
pub use errors::{
    ApplicationError, DependencyError, LaunchError, ModuleChain, RegistrationError,
};
pub use factories::DefaultFactory;
pub use lifecycle::{LaunchOptions, LifecycleEvent, LifecycleHandler};
pub use manager::DependencyManager;
pub use module::{DefaultStandard, Module, Standard};
pub use notifications::{
    BackgroundFetchResult, DeviceToken, Notification, NotificationHandler, NotificationPlatform,
    NotificationResponse, NoopPlatform, PresentationOptions, Registration, RemoteNotifications,
    RemotePayload,
};
pub use types::{DynError, Instance, ModuleId, SharedValues};
