use std::collections::BTreeMap;

/// Options the host application was launched with
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOptions {
    options: BTreeMap<String, String>,
}

impl LaunchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// Receives application and scene lifecycle events
///
/// Every method does nothing by default.
pub trait LifecycleHandler: Send + Sync {
    fn will_finish_launching(&self, options: &LaunchOptions) {
        let _ = options;
    }

    fn scene_will_enter_foreground(&self) {}

    fn scene_did_become_active(&self) {}

    fn scene_will_resign_active(&self) {}

    fn scene_did_enter_background(&self) {}

    fn application_will_terminate(&self) {}
}

/// A lifecycle event forwarded from the host application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    WillFinishLaunching(LaunchOptions),
    SceneWillEnterForeground,
    SceneDidBecomeActive,
    SceneWillResignActive,
    SceneDidEnterBackground,
    ApplicationWillTerminate,
}

impl LifecycleEvent {
    /// Calls the matching method on `handler`
    pub fn dispatch(&self, handler: &dyn LifecycleHandler) {
        match self {
            LifecycleEvent::WillFinishLaunching(options) => handler.will_finish_launching(options),
            LifecycleEvent::SceneWillEnterForeground => handler.scene_will_enter_foreground(),
            LifecycleEvent::SceneDidBecomeActive => handler.scene_did_become_active(),
            LifecycleEvent::SceneWillResignActive => handler.scene_will_resign_active(),
            LifecycleEvent::SceneDidEnterBackground => handler.scene_did_enter_background(),
            LifecycleEvent::ApplicationWillTerminate => handler.application_will_terminate(),
        }
    }
}
