//! Two-tier resolution of client construction inputs.
//!
//! Every resolver consults an environment-variable override first and only
//! falls back to the secret store when the override is absent. The override
//! check is side-effect free: when the variable is set, no secret-store
//! round trip happens and the caller pays no resolution latency.
//!
//! Missing inputs in both tiers reject with [`ProviderError`]; there is no
//! retry and no default value.

use crate::errors::{ProviderError, ProviderResult};
use crate::secrets::{well_known, SecretName, SecretStore, SecretValue};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Environment override for the storage account name shared by the blob and
/// queue clients.
pub const STORAGE_ACCOUNT_ENV: &str = "AZURE_STORAGE_NAME";

/// Key vault URL. Environment-only; there is no secret fallback because the
/// vault client is what the fallback would need.
pub const KEY_VAULT_URL_ENV: &str = "KEY_VAULT_URL";

/// Environment override for the document database endpoint.
pub const DOCUMENT_DB_URL_ENV: &str = "COSMOS_DB_URL";

/// Environment override for the document database access key.
pub const DOCUMENT_DB_KEY_ENV: &str = "COSMOS_DB_KEY";

// ============================================================================
// Resolved construction inputs
// ============================================================================

/// Blob service endpoint derived from a storage account name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobEndpoint {
    /// Storage account name.
    pub account: String,

    /// Service URL: `https://{account}.blob.core.windows.net`.
    pub url: String,
}

/// Queue service endpoint derived from a storage account name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEndpoint {
    /// Storage account name.
    pub account: String,

    /// Service URL: `https://{account}.queue.core.windows.net`.
    pub url: String,
}

/// Inputs for constructing a document database client.
///
/// `key` holds the raw access key; the struct opts out of `Debug` derivation
/// to keep it out of log output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentClientOptions {
    /// Database endpoint URL.
    pub endpoint: String,

    /// Account access key.
    pub key: String,
}

impl std::fmt::Debug for DocumentClientOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentClientOptions")
            .field("endpoint", &self.endpoint)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Collaborator that derives a database access key from a resolved ARM
/// resource URL. Only the document client provider uses it.
#[async_trait]
pub trait AccessKeyResolver: Send + Sync {
    /// Resolve the access key for the database identified by `arm_url`.
    async fn get_access_key(&self, arm_url: &str) -> ProviderResult<SecretValue>;
}

// ============================================================================
// Resolution functions
// ============================================================================

/// Derive the blob service endpoint for a storage account.
pub fn blob_endpoint(account: &str) -> BlobEndpoint {
    BlobEndpoint {
        account: account.to_string(),
        url: format!("https://{account}.blob.core.windows.net"),
    }
}

/// Derive the queue service endpoint for a storage account.
pub fn queue_endpoint(account: &str) -> QueueEndpoint {
    QueueEndpoint {
        account: account.to_string(),
        url: format!("https://{account}.queue.core.windows.net"),
    }
}

/// Resolve the storage account name.
///
/// Uses `AZURE_STORAGE_NAME` when set; otherwise fetches the
/// `storage-account-name` secret.
pub async fn resolve_storage_account(secrets: &dyn SecretStore) -> ProviderResult<String> {
    if let Ok(account) = std::env::var(STORAGE_ACCOUNT_ENV) {
        return Ok(account);
    }

    let name = SecretName::new(well_known::STORAGE_ACCOUNT_NAME)?;
    let value = secrets.get_secret(&name).await?;
    Ok(value.expose_secret().to_string())
}

/// Resolve the key vault URL from `KEY_VAULT_URL`.
///
/// # Errors
///
/// Returns [`ProviderError::MissingConfiguration`] when the variable is not
/// set.
pub fn vault_url() -> ProviderResult<String> {
    std::env::var(KEY_VAULT_URL_ENV).map_err(|_| ProviderError::MissingConfiguration {
        variable: KEY_VAULT_URL_ENV.to_string(),
    })
}

/// Resolve endpoint and key for the document database client.
///
/// When both `COSMOS_DB_URL` and `COSMOS_DB_KEY` are set, they are used
/// verbatim with zero secret-store calls. Otherwise the endpoint and the ARM
/// resource URL are fetched from the secret store, and the access key is
/// derived from the ARM URL through `access_keys`. A partial override (only
/// one variable set) falls through to the secret chain.
pub async fn resolve_document_options(
    secrets: &dyn SecretStore,
    access_keys: &dyn AccessKeyResolver,
) -> ProviderResult<DocumentClientOptions> {
    if let (Ok(endpoint), Ok(key)) = (
        std::env::var(DOCUMENT_DB_URL_ENV),
        std::env::var(DOCUMENT_DB_KEY_ENV),
    ) {
        return Ok(DocumentClientOptions { endpoint, key });
    }

    let endpoint = secrets
        .get_secret(&SecretName::new(well_known::DOCUMENT_DB_URL)?)
        .await?;
    let arm_url = secrets
        .get_secret(&SecretName::new(well_known::DOCUMENT_DB_ARM_URL)?)
        .await?;
    let key = access_keys.get_access_key(arm_url.expose_secret()).await?;

    Ok(DocumentClientOptions {
        endpoint: endpoint.expose_secret().to_string(),
        key: key.expose_secret().to_string(),
    })
}

#[cfg(test)]
#[path = "resolution_tests.rs"]
mod tests;
