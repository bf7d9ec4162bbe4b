use std::sync::Mutex;

use spezi::{Module, Standard};

use super::health_sources::Sample;

/// Receives every sample the application collects
#[derive(Debug, Default)]
pub struct HealthStandard {
    samples: Mutex<Vec<Sample>>,
}
impl Module for HealthStandard {}
impl Standard for HealthStandard {}

impl HealthStandard {
    pub fn add_samples(&self, samples: impl IntoIterator<Item = Sample>) {
        let mut stored = self.samples.lock().unwrap_or_else(|e| e.into_inner());
        stored.extend(samples);
        tracing::debug!("Standard holds {} samples", stored.len());
    }

    pub fn samples(&self) -> Vec<Sample> {
        self.samples.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}
