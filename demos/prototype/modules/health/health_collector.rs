use std::sync::Mutex;

use futures::future::BoxFuture;
use spezi::{
    Application, BackgroundFetchResult, Dependency, DependencyCollection, DependencyDeclaration,
    DynError, LifecycleHandler, Module, NotificationHandler, OptionalDependency, RemotePayload,
};
use spezi_config::Config;

use crate::modules::{account::AccountModule, scheduler::Scheduler};

use super::{
    health_sources::{HeartRateSource, Sample, SimulatedSource, StepCountSource},
    health_standard::HealthStandard,
};

/// Settings of the [`HealthDataCollector`]
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub track_heart_rate: bool,
    pub simulated: bool,
    pub sync_interval_minutes: u32,
}

/// Collects samples from its sources and hands them to the standard
pub struct HealthDataCollector {
    standard: Dependency<HealthStandard>,
    account: Dependency<AccountModule>,
    scheduler: OptionalDependency<Scheduler>,
    sources: DependencyCollection,
    interval: Mutex<Option<u32>>,
}

impl HealthDataCollector {
    pub fn new(config: &CollectorConfig) -> Self {
        let sources = DependencyCollection::new()
            .either(
                config.simulated,
                |c| c.module(SimulatedSource::default),
                |c| c.module(StepCountSource::default),
            )
            .when(config.track_heart_rate && !config.simulated, |c| {
                c.module(HeartRateSource::default)
            });

        HealthDataCollector {
            standard: Dependency::required(),
            account: Dependency::required(),
            scheduler: OptionalDependency::new(),
            sources,
            interval: Mutex::new(None),
        }
    }

    /// Reads every source once and forwards the samples to the standard
    pub fn collect(&self) -> usize {
        let mut samples: Vec<Sample> = Vec::new();
        if let Some(source) = self.sources.find::<StepCountSource>() {
            samples.push(source.read());
        }
        if let Some(source) = self.sources.find::<HeartRateSource>() {
            samples.push(source.read());
        }
        if let Some(source) = self.sources.find::<SimulatedSource>() {
            samples.push(source.read());
        }

        let count = samples.len();
        self.standard.add_samples(samples);
        count
    }

    pub fn source_count(&self) -> usize {
        self.sources.modules().len()
    }

    /// Minutes between syncs, known once configured
    pub fn sync_interval(&self) -> Option<u32> {
        *self.interval.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Module for HealthDataCollector {
    fn dependencies(&self) -> Vec<&dyn DependencyDeclaration> {
        vec![&self.standard, &self.account, &self.scheduler, &self.sources]
    }

    fn configure(&self, app: &Application<'_>) -> Result<(), DynError> {
        let config = app.resolve::<Config<CollectorConfig>>()?;
        *self.interval.lock().unwrap_or_else(|e| e.into_inner()) =
            Some(config.sync_interval_minutes);

        let _span = app.logger().enter();
        if self.account.user().is_none() {
            tracing::warn!("Collecting without a signed in account");
        }
        match self.scheduler.get() {
            Some(scheduler) => scheduler.schedule(format!(
                "health sync every {} minutes",
                config.sync_interval_minutes
            )),
            None => tracing::info!("No scheduler configured, syncing on demand only"),
        }
        Ok(())
    }

    fn as_lifecycle_handler(&self) -> Option<&dyn LifecycleHandler> {
        Some(self)
    }

    fn as_notification_handler(&self) -> Option<&dyn NotificationHandler> {
        Some(self)
    }
}

impl LifecycleHandler for HealthDataCollector {
    fn scene_did_enter_background(&self) {
        let collected = self.collect();
        tracing::info!("Collected {collected} samples before entering the background");
    }
}

impl NotificationHandler for HealthDataCollector {
    fn receive_remote_notification<'a>(
        &'a self,
        payload: &'a RemotePayload,
    ) -> BoxFuture<'a, BackgroundFetchResult> {
        Box::pin(async move {
            if payload.get("action").map(String::as_str) != Some("sync") {
                return BackgroundFetchResult::NoData;
            }

            match self.collect() {
                0 => BackgroundFetchResult::NoData,
                _ => BackgroundFetchResult::NewData,
            }
        })
    }
}
