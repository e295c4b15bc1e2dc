//! Key-vault-backed secret store.

use crate::errors::{ProviderError, ProviderResult};
use crate::secrets::{SecretName, SecretStore, SecretValue};
use crate::singleton::SingletonProvider;
use async_trait::async_trait;
use azure_security_keyvault::SecretClient;
use std::sync::Arc;
use tracing::debug;

/// [`SecretStore`] implementation over the singleton key vault client.
///
/// Shares the same lazily-constructed `SecretClient` as the registry's
/// vault slot, so the first secret fetch also drives vault client
/// construction.
pub struct KeyVaultSecretStore {
    vault: Arc<SingletonProvider<SecretClient>>,
}

impl KeyVaultSecretStore {
    /// Create a store over a shared vault client provider.
    pub fn new(vault: Arc<SingletonProvider<SecretClient>>) -> Self {
        Self { vault }
    }
}

#[async_trait]
impl SecretStore for KeyVaultSecretStore {
    async fn get_secret(&self, name: &SecretName) -> ProviderResult<SecretValue> {
        debug!(secret_name = %name, "fetching secret from key vault");

        let client = self.vault.get().await?;
        let secret = client
            .get(name.as_str())
            .await
            .map_err(|e| ProviderError::SecretResolution {
                name: name.to_string(),
                message: e.to_string(),
            })?;

        let value = secret.value().ok_or_else(|| ProviderError::SecretResolution {
            name: name.to_string(),
            message: "secret has no value".to_string(),
        })?;

        Ok(SecretValue::from_string(value.to_string()))
    }
}
