use std::{
    collections::BTreeMap,
    fmt::{Debug, Display},
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex, PoisonError},
    task::{Context, Poll},
};

use futures::future::BoxFuture;
use futures_channel::oneshot;
use pin_project_lite::pin_project;

use crate::errors::RegistrationError;

/// Key value payload of a notification
pub type RemotePayload = BTreeMap<String, String>;

/// A delivered notification
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notification {
    pub identifier: String,
    pub category: Option<String>,
    pub payload: RemotePayload,
}

/// The user interacted with a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationResponse {
    pub notification: Notification,
    pub action_identifier: String,
}

/// How a notification is presented while the app is in the foreground
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresentationOptions {
    pub banner: bool,
    pub list: bool,
    pub sound: bool,
    pub badge: bool,
}
impl PresentationOptions {
    pub fn union(self, other: PresentationOptions) -> PresentationOptions {
        PresentationOptions {
            banner: self.banner || other.banner,
            list: self.list || other.list,
            sound: self.sound || other.sound,
            badge: self.badge || other.badge,
        }
    }
}

/// Outcome of handling a background remote notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundFetchResult {
    NewData,
    NoData,
    Failed,
}

/// Receives notifications forwarded by the container
///
/// All handlers are called concurrently. The defaults do nothing.
pub trait NotificationHandler: Send + Sync {
    fn handle_notification_action<'a>(
        &'a self,
        response: &'a NotificationResponse,
    ) -> BoxFuture<'a, ()> {
        let _ = response;
        Box::pin(async {})
    }

    /// Return `None` if this handler has no opinion on the presentation
    fn receive_incoming_notification<'a>(
        &'a self,
        notification: &'a Notification,
    ) -> BoxFuture<'a, Option<PresentationOptions>> {
        let _ = notification;
        Box::pin(async { None })
    }

    fn receive_remote_notification<'a>(
        &'a self,
        payload: &'a RemotePayload,
    ) -> BoxFuture<'a, BackgroundFetchResult> {
        let _ = payload;
        Box::pin(async { BackgroundFetchResult::NoData })
    }
}

/// Token identifying this device to the push service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceToken(pub Vec<u8>);
impl Display for DeviceToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.iter().try_for_each(|byte| write!(f, "{byte:02x}"))
    }
}

/// The host platform's remote notification registration
pub trait NotificationPlatform: Send + Sync {
    fn register_for_remote_notifications(&self);

    fn unregister_for_remote_notifications(&self);
}

/// Platform used when the host application does not provide one
///
/// Registrations only complete when the host calls back into [`RemoteNotifications`].
#[derive(Debug, Default)]
pub struct NoopPlatform;
impl NotificationPlatform for NoopPlatform {
    fn register_for_remote_notifications(&self) {
        tracing::debug!("No notification platform configured, waiting for a callback");
    }

    fn unregister_for_remote_notifications(&self) {}
}

type RegistrationSender = oneshot::Sender<Result<DeviceToken, RegistrationError>>;

/// Shared helper to register the device for remote notifications
///
/// Reached through the application context, one per container.
pub struct RemoteNotifications {
    platform: Arc<dyn NotificationPlatform>,
    pending: Mutex<Option<RegistrationSender>>,
}
impl Debug for RemoteNotifications {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteNotifications")
            .field("pending", &self.is_pending())
            .finish()
    }
}

impl RemoteNotifications {
    pub fn new(platform: Arc<dyn NotificationPlatform>) -> Self {
        RemoteNotifications {
            platform,
            pending: Mutex::new(None),
        }
    }

    /// Registers for remote notifications
    ///
    /// Resolves with the device token once the platform called back. A newer
    /// registration cancels one which is still pending.
    pub fn register(&self) -> Registration {
        let (tx, rx) = oneshot::channel();
        let previous = self.lock().replace(tx);
        if let Some(previous) = previous {
            tracing::debug!("Cancelling pending remote notification registration");
            let _ = previous.send(Err(RegistrationError::Cancelled));
        }

        self.platform.register_for_remote_notifications();
        Registration { rx }
    }

    pub fn unregister(&self) {
        self.platform.unregister_for_remote_notifications();
    }

    /// Platform callback: registration succeeded
    pub fn did_register(&self, token: DeviceToken) {
        self.complete(Ok(token));
    }

    /// Platform callback: registration failed
    pub fn did_fail_to_register(&self, reason: impl Into<String>) {
        self.complete(Err(RegistrationError::Failed(reason.into())));
    }

    pub fn is_pending(&self) -> bool {
        self.lock().is_some()
    }

    fn complete(&self, result: Result<DeviceToken, RegistrationError>) {
        match self.lock().take() {
            // Error can be ignored, it just means nobody waits anymore
            Some(tx) => {
                let _ = tx.send(result);
            }
            None => tracing::warn!("Received a registration result without a pending registration"),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<RegistrationSender>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pin_project! {
    /// Future of a pending remote notification registration
    pub struct Registration {
        #[pin]
        rx: oneshot::Receiver<Result<DeviceToken, RegistrationError>>,
    }
}
impl Future for Registration {
    type Output = Result<DeviceToken, RegistrationError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.project().rx.poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            // Sender dropped without an answer
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(Err(RegistrationError::Cancelled)),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Combines the answers of several handlers to a background notification
pub(crate) fn combine_fetch_results(
    results: impl IntoIterator<Item = BackgroundFetchResult>,
) -> BackgroundFetchResult {
    results
        .into_iter()
        .fold(BackgroundFetchResult::NoData, |combined, result| {
            match (combined, result) {
                (BackgroundFetchResult::Failed, _) | (_, BackgroundFetchResult::Failed) => {
                    BackgroundFetchResult::Failed
                }
                (BackgroundFetchResult::NewData, _) | (_, BackgroundFetchResult::NewData) => {
                    BackgroundFetchResult::NewData
                }
                _ => BackgroundFetchResult::NoData,
            }
        })
}
