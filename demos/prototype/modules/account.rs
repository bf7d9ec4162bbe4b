use std::{collections::BTreeMap, sync::Mutex};

use spezi::{Application, Dependency, DependencyDeclaration, DynError, Module};

/// Key value store for credentials
///
/// Created from the account's default if the application does not configure one.
#[derive(Debug, Default)]
pub struct SecureStorage {
    entries: Mutex<BTreeMap<String, String>>,
}
impl Module for SecureStorage {}

impl SecureStorage {
    pub fn store(&self, key: impl Into<String>, value: impl Into<String>) {
        self.lock().insert(key.into(), value.into());
    }

    pub fn load(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

const ACCOUNT_KEY: &str = "account.user";

pub struct AccountModule {
    storage: Dependency<SecureStorage>,
}
impl Default for AccountModule {
    fn default() -> Self {
        AccountModule {
            storage: Dependency::with_default(SecureStorage::default),
        }
    }
}

impl Module for AccountModule {
    fn dependencies(&self) -> Vec<&dyn DependencyDeclaration> {
        vec![&self.storage]
    }

    fn configure(&self, app: &Application<'_>) -> Result<(), DynError> {
        let _span = app.logger().enter();
        match self.user() {
            Some(user) => tracing::info!("Restored account of '{user}'"),
            None => tracing::info!("No account signed in"),
        }
        Ok(())
    }
}

impl AccountModule {
    pub fn sign_in(&self, user: &str) {
        self.storage.store(ACCOUNT_KEY, user);
        tracing::info!("'{user}' signed in");
    }

    pub fn user(&self) -> Option<String> {
        self.storage.load(ACCOUNT_KEY)
    }
}
