use std::sync::{Arc, Mutex};

use futures::{executor::block_on, future::BoxFuture};
use spezi::{
    Application, BackgroundFetchResult, Configuration, DependencyDeclaration, DependencyError,
    Dependency, DynError, EnvironmentAccess, LaunchError, LaunchOptions, LifecycleEvent,
    LifecycleHandler, LifecycleHandling, Module, ModuleId, Notification, NotificationHandler,
    NotificationHandling, PresentationOptions, RemoteNotifications, RemotePayload, Standard,
};
use tracing::Span;

/// Names of the modules in the order they were configured
#[derive(Default)]
struct ConfigureLog(Mutex<Vec<&'static str>>);
impl ConfigureLog {
    fn record(&self, name: &'static str) {
        self.0.lock().unwrap().push(name);
    }

    fn entries(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().clone()
    }
}

fn record(app: &Application<'_>, name: &'static str) {
    if let Some(log) = app.shared::<Arc<ConfigureLog>>() {
        log.record(name);
    }
}

struct Storage;
impl Module for Storage {
    fn configure(&self, app: &Application<'_>) -> Result<(), DynError> {
        record(app, "storage");
        Ok(())
    }
}

struct Account {
    storage: Dependency<Storage>,
}
impl Account {
    fn new() -> Self {
        Account {
            storage: Dependency::with_default(|| Storage),
        }
    }
}
impl Module for Account {
    fn dependencies(&self) -> Vec<&dyn DependencyDeclaration> {
        vec![&self.storage]
    }

    fn configure(&self, app: &Application<'_>) -> Result<(), DynError> {
        // Dependencies are injected before any module is configured
        assert!(self.storage.try_get().is_ok());
        record(app, "account");
        Ok(())
    }
}

struct Collector {
    account: Dependency<Account>,
}
impl Module for Collector {
    fn dependencies(&self) -> Vec<&dyn DependencyDeclaration> {
        vec![&self.account]
    }

    fn configure(&self, app: &Application<'_>) -> Result<(), DynError> {
        record(app, "collector");
        Ok(())
    }
}

#[test]
fn modules_are_configured_after_their_dependencies() {
    let log = Arc::new(ConfigureLog::default());

    let spezi = Configuration::new()
        .with_shared(log.clone())
        .module(Collector {
            account: Dependency::required(),
        })
        .module(Account::new())
        .launch()
        .unwrap();

    assert_eq!(log.entries(), vec!["storage", "account", "collector"]);
    assert_eq!(
        spezi.module_ids(),
        vec![
            ModuleId::of::<spezi::DefaultStandard>(),
            ModuleId::of::<Storage>(),
            ModuleId::of::<Account>(),
            ModuleId::of::<Collector>(),
        ]
    );

    let collector = spezi.module::<Collector>().unwrap();
    let account = spezi.module::<Account>().unwrap();
    assert!(Arc::ptr_eq(collector.account.get(), &account));
}

struct Left {
    right: Dependency<Right>,
    log: Arc<ConfigureLog>,
}
impl Module for Left {
    fn dependencies(&self) -> Vec<&dyn DependencyDeclaration> {
        vec![&self.right]
    }

    fn configure(&self, _: &Application<'_>) -> Result<(), DynError> {
        self.log.record("left");
        Ok(())
    }
}

struct Right {
    left: Dependency<Left>,
    log: Arc<ConfigureLog>,
}
impl Module for Right {
    fn dependencies(&self) -> Vec<&dyn DependencyDeclaration> {
        vec![&self.left]
    }

    fn configure(&self, _: &Application<'_>) -> Result<(), DynError> {
        self.log.record("right");
        Ok(())
    }
}

#[test]
fn cycle_fails_launch_before_configure() {
    let log = Arc::new(ConfigureLog::default());

    let err = Configuration::new()
        .module(Left {
            right: Dependency::required(),
            log: log.clone(),
        })
        .module(Right {
            left: Dependency::required(),
            log: log.clone(),
        })
        .launch()
        .unwrap_err();

    let LaunchError::Dependency(DependencyError::Cycle { chain }) = &err else {
        panic!("expected a cycle, got {err:?}");
    };
    assert!(chain.contains(&ModuleId::of::<Left>()));
    assert!(chain.contains(&ModuleId::of::<Right>()));
    assert!(err.to_string().contains(" -> "));
    assert!(log.entries().is_empty());
}

#[test]
fn missing_dependency_fails_launch() {
    let err = Configuration::new()
        .module(Collector {
            account: Dependency::required(),
        })
        .launch()
        .unwrap_err();

    match err {
        LaunchError::Dependency(DependencyError::MissingDependency {
            required_by,
            dependency,
        }) => {
            assert_eq!(required_by, ModuleId::of::<Collector>());
            assert_eq!(dependency, ModuleId::of::<Account>());
        }
        other => panic!("expected a missing dependency, got {other:?}"),
    }
}

struct Failing;
impl Module for Failing {
    fn configure(&self, _: &Application<'_>) -> Result<(), DynError> {
        Err("storage is locked".into())
    }
}

#[test]
fn configure_failure_stops_launch() {
    let log = Arc::new(ConfigureLog::default());

    let err = Configuration::new()
        .with_shared(log.clone())
        .module(Failing)
        .module(Storage)
        .launch()
        .unwrap_err();

    match err {
        LaunchError::ConfigureFailed { module, error } => {
            assert_eq!(module, ModuleId::of::<Failing>());
            assert_eq!(error.to_string(), "storage is locked");
        }
        other => panic!("expected a configure failure, got {other:?}"),
    }
    assert!(log.entries().is_empty());
}

#[derive(Default)]
struct Onboarding {
    events: Mutex<Vec<String>>,
}
impl Module for Onboarding {
    fn as_lifecycle_handler(&self) -> Option<&dyn LifecycleHandler> {
        Some(self)
    }

    fn is_environment_accessible(&self) -> bool {
        true
    }
}
impl LifecycleHandler for Onboarding {
    fn will_finish_launching(&self, options: &LaunchOptions) {
        let source = options.get("source").unwrap_or("none").to_string();
        self.events.lock().unwrap().push(format!("launching:{source}"));
    }

    fn scene_did_enter_background(&self) {
        self.events.lock().unwrap().push("background".to_string());
    }
}

struct HealthStandard;
impl Module for HealthStandard {}
impl Standard for HealthStandard {}

#[test]
fn lifecycle_events_reach_handlers() {
    let mut options = LaunchOptions::new();
    options.insert("source", "push");

    let spezi = Configuration::with_standard(HealthStandard)
        .module(Onboarding::default())
        .module(Storage)
        .launch_options(options)
        .launch()
        .unwrap();

    assert_eq!(spezi.modules_conforming::<LifecycleHandling>().len(), 1);

    spezi.will_finish_launching();
    spezi.handle_lifecycle_event(&LifecycleEvent::SceneDidEnterBackground);

    let onboarding = spezi.module::<Onboarding>().unwrap();
    assert_eq!(
        *onboarding.events.lock().unwrap(),
        vec!["launching:push".to_string(), "background".to_string()]
    );
}

#[test]
fn standard_is_the_first_module() {
    let spezi = Configuration::with_standard(HealthStandard)
        .module(Storage)
        .launch()
        .unwrap();

    assert!(spezi.standard::<HealthStandard>().is_some());
    assert!(spezi.standard::<spezi::DefaultStandard>().is_none());
    assert_eq!(spezi.modules()[0].id(), ModuleId::of::<HealthStandard>());
}

#[test]
fn environment_holds_accessible_modules_only() {
    let spezi = Configuration::new()
        .module(Onboarding::default())
        .module(Storage)
        .launch()
        .unwrap();

    let environment = spezi.environment();
    assert_eq!(environment.len(), 1);
    assert!(environment.contains::<Onboarding>());
    assert!(environment.get::<Storage>().is_none());
    assert_eq!(spezi.modules_conforming::<EnvironmentAccess>().len(), 1);

    let from_environment = environment.get::<Onboarding>().unwrap();
    let from_container = spezi.module::<Onboarding>().unwrap();
    assert!(Arc::ptr_eq(&from_environment, &from_container));
}

struct Presenter {
    presentation: Option<PresentationOptions>,
    fetch: BackgroundFetchResult,
    actions: Mutex<Vec<String>>,
}
impl Presenter {
    fn new(presentation: Option<PresentationOptions>, fetch: BackgroundFetchResult) -> Self {
        Presenter {
            presentation,
            fetch,
            actions: Mutex::new(Vec::new()),
        }
    }
}
impl Module for Presenter {
    fn as_notification_handler(&self) -> Option<&dyn NotificationHandler> {
        Some(self)
    }
}
impl NotificationHandler for Presenter {
    fn handle_notification_action<'a>(
        &'a self,
        response: &'a spezi::NotificationResponse,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            self.actions
                .lock()
                .unwrap()
                .push(response.action_identifier.clone());
        })
    }

    fn receive_incoming_notification<'a>(
        &'a self,
        _: &'a Notification,
    ) -> BoxFuture<'a, Option<PresentationOptions>> {
        Box::pin(async move { self.presentation })
    }

    fn receive_remote_notification<'a>(
        &'a self,
        _: &'a RemotePayload,
    ) -> BoxFuture<'a, BackgroundFetchResult> {
        Box::pin(async move { self.fetch })
    }
}

/// A second handler type, lookups are by type
struct Silent;
impl Module for Silent {
    fn as_notification_handler(&self) -> Option<&dyn NotificationHandler> {
        Some(self)
    }
}
impl NotificationHandler for Silent {}

#[test]
fn notifications_are_combined_over_handlers() {
    let banner = PresentationOptions {
        banner: true,
        ..Default::default()
    };

    let spezi = Configuration::new()
        .module(Presenter::new(Some(banner), BackgroundFetchResult::NewData))
        .module(Silent)
        .launch()
        .unwrap();
    assert_eq!(spezi.modules_conforming::<NotificationHandling>().len(), 2);

    let notification = Notification {
        identifier: "reminder".to_string(),
        ..Default::default()
    };
    assert_eq!(
        block_on(spezi.receive_incoming_notification(&notification)),
        Some(banner)
    );
    assert_eq!(
        block_on(spezi.receive_remote_notification(&RemotePayload::new())),
        BackgroundFetchResult::NewData
    );

    let response = spezi::NotificationResponse {
        notification,
        action_identifier: "snooze".to_string(),
    };
    block_on(spezi.handle_notification_action(&response));
    let presenter = spezi.module::<Presenter>().unwrap();
    assert_eq!(*presenter.actions.lock().unwrap(), vec!["snooze".to_string()]);
}

#[test]
fn incoming_notification_without_opinion_is_none() {
    let spezi = Configuration::new().module(Silent).launch().unwrap();

    let presentation = block_on(spezi.receive_incoming_notification(&Notification::default()));
    assert_eq!(presentation, None);
}

/// Reads every application value while configured
#[derive(Default)]
struct Registrar {
    notifications: Mutex<Option<Arc<RemoteNotifications>>>,
    resolved_logger: Mutex<bool>,
    options: Mutex<Option<LaunchOptions>>,
}
impl Module for Registrar {
    fn configure(&self, app: &Application<'_>) -> Result<(), DynError> {
        assert_eq!(app.module_id(), ModuleId::of::<Registrar>());
        assert!(app.module::<Storage>().is_some());

        let _logger = app.resolve::<Span>()?;
        *self.resolved_logger.lock().unwrap() = true;
        *self.notifications.lock().unwrap() = Some(app.resolve::<Arc<RemoteNotifications>>()?);
        *self.options.lock().unwrap() = Some(app.resolve::<LaunchOptions>()?);
        Ok(())
    }
}

#[test]
fn application_values_are_shared_with_the_container() {
    let mut options = LaunchOptions::new();
    options.insert("locale", "de");

    let spezi = Configuration::new()
        .module(Storage)
        .module(Registrar::default())
        .launch_options(options.clone())
        .launch()
        .unwrap();

    let registrar = spezi.module::<Registrar>().unwrap();
    let notifications = registrar.notifications.lock().unwrap().clone().unwrap();
    assert!(Arc::ptr_eq(&notifications, spezi.remote_notifications()));
    assert_eq!(registrar.options.lock().unwrap().as_ref(), Some(&options));
    assert_eq!(spezi.launch_options(), &options);
    assert!(*registrar.resolved_logger.lock().unwrap());
}

#[test]
fn loaded_dependency_is_the_supplied_instance() {
    struct Uploader {
        storage: Dependency<Storage>,
    }
    impl Module for Uploader {
        fn dependencies(&self) -> Vec<&dyn DependencyDeclaration> {
            vec![&self.storage]
        }
    }

    let spezi = Configuration::new()
        .module(Uploader {
            storage: Dependency::load(Storage),
        })
        .launch()
        .unwrap();

    let uploader = spezi.module::<Uploader>().unwrap();
    let storage = spezi.module::<Storage>().unwrap();
    assert!(Arc::ptr_eq(uploader.storage.get(), &storage));
}

#[test]
fn container_can_be_shared_between_threads() {
    let spezi = Configuration::new()
        .module(Account::new())
        .launch()
        .unwrap();

    let handle = {
        let spezi = spezi.clone();
        std::thread::spawn(move || spezi.module::<Account>().is_some())
    };
    assert!(handle.join().unwrap());
    assert!(format!("{spezi:?}").contains("Account"));
}
