use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, OnceLock,
};

use spezi::{
    Application, DynError, LaunchOptions, LifecycleHandler, Module, RemoteNotifications,
};

/// Walks new users through the app, reachable from the environment
#[derive(Debug, Default)]
pub struct OnboardingModule {
    completed: AtomicBool,
    notifications: OnceLock<Arc<RemoteNotifications>>,
}

impl Module for OnboardingModule {
    fn configure(&self, app: &Application<'_>) -> Result<(), DynError> {
        let notifications = app.resolve::<Arc<RemoteNotifications>>()?;
        let _ = self.notifications.set(notifications);
        Ok(())
    }

    fn as_lifecycle_handler(&self) -> Option<&dyn LifecycleHandler> {
        Some(self)
    }

    fn is_environment_accessible(&self) -> bool {
        true
    }
}

impl LifecycleHandler for OnboardingModule {
    fn will_finish_launching(&self, options: &LaunchOptions) {
        if options.get("skip_onboarding") == Some("true") {
            self.complete();
            return;
        }
        if !self.is_completed() {
            tracing::info!("Showing onboarding");
        }
    }

    fn application_will_terminate(&self) {
        tracing::debug!("Onboarding completed: {}", self.is_completed());
    }
}

impl OnboardingModule {
    pub fn complete(&self) {
        self.completed.store(true, Ordering::SeqCst);
        tracing::info!("Onboarding completed");
    }

    pub fn is_completed(&self) -> bool {
        self.completed.load(Ordering::SeqCst)
    }

    /// The registration helper captured while configured
    pub fn notifications(&self) -> Option<&Arc<RemoteNotifications>> {
        self.notifications.get()
    }
}
