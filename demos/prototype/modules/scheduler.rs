use std::sync::Mutex;

use spezi::Module;

/// Runs recurring tasks, other modules use it if it is configured
#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: Mutex<Vec<String>>,
}
impl Module for Scheduler {}

impl Scheduler {
    pub fn schedule(&self, task: impl Into<String>) {
        let task = task.into();
        tracing::info!("Scheduled '{task}'");
        self.tasks.lock().unwrap_or_else(|e| e.into_inner()).push(task);
    }

    pub fn tasks(&self) -> Vec<String> {
        self.tasks.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}
