//! In-memory secret store for testing and development.
//!
//! Records per-name fetch counts so tests can assert how many secret-store
//! round trips a resolution path performed.

use crate::errors::{ProviderError, ProviderResult};
use crate::secrets::{SecretName, SecretStore, SecretValue};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// Thread-safe in-memory secret store.
pub struct InMemorySecretStore {
    secrets: RwLock<HashMap<SecretName, SecretValue>>,
    calls: RwLock<HashMap<SecretName, usize>>,
}

impl InMemorySecretStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            secrets: RwLock::new(HashMap::new()),
            calls: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or replace a secret.
    pub fn insert(&self, name: SecretName, value: SecretValue) {
        self.secrets.write().unwrap().insert(name, value);
    }

    /// Number of `get_secret` calls observed for `name`.
    pub fn call_count(&self, name: &str) -> usize {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter(|(key, _)| key.as_str() == name)
            .map(|(_, count)| *count)
            .sum()
    }

    /// Total `get_secret` calls across all names.
    pub fn total_calls(&self) -> usize {
        self.calls.read().unwrap().values().sum()
    }
}

impl Default for InMemorySecretStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn get_secret(&self, name: &SecretName) -> ProviderResult<SecretValue> {
        *self
            .calls
            .write()
            .unwrap()
            .entry(name.clone())
            .or_insert(0) += 1;

        self.secrets
            .read()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| ProviderError::SecretResolution {
                name: name.to_string(),
                message: "secret not found".to_string(),
            })
    }
}

#[cfg(test)]
#[path = "memory_secret_store_tests.rs"]
mod tests;
