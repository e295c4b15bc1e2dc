//! Production Azure client registry.
//!
//! Assembles a [`ClientRegistry`] over the Azure SDK clients: blob and
//! queue service clients authenticated with the shared token credential,
//! the key vault secret client, and the document database client whose
//! access key is derived through an ARM `listKeys` call.

use crate::credentials::AuthenticationMethod;
use crate::errors::{ProviderError, ProviderResult};
use crate::registry::{vault_client_provider, ClientRegistry, DOCUMENT_CLIENT_KEY};
use crate::resolution::{AccessKeyResolver, BlobEndpoint, DocumentClientOptions, QueueEndpoint};
use crate::secrets::{SecretStore, SecretValue};
use async_trait::async_trait;
use azure_core::auth::TokenCredential;
use azure_data_cosmos::prelude::{AuthorizationToken, CosmosClient};
use azure_security_keyvault::SecretClient;
use azure_storage::StorageCredentials;
use azure_storage_blobs::prelude::BlobServiceClient;
use azure_storage_queues::prelude::QueueServiceClient;
use std::sync::Arc;
use tracing::debug;
use url::Url;

use super::azure_credentials::AzureCredentialsProvider;
use super::azure_secret_store::KeyVaultSecretStore;

/// ARM scope for management-plane tokens.
const ARM_SCOPE: &str = "https://management.azure.com/.default";

/// API version for the ARM `listKeys` operation.
const LIST_KEYS_API_VERSION: &str = "2021-04-15";

/// Registry over the concrete Azure SDK client types.
pub type AzureClientRegistry =
    ClientRegistry<BlobServiceClient, QueueServiceClient, SecretClient, CosmosClient>;

// ============================================================================
// ArmAccessKeyResolver
// ============================================================================

/// Derives the document database access key from its ARM resource URL.
///
/// Issues `POST {arm_url}/listKeys` with a management-plane bearer token
/// and extracts the primary master key from the response body.
pub struct ArmAccessKeyResolver {
    credentials: Arc<AzureCredentialsProvider>,
    http: reqwest::Client,
}

impl ArmAccessKeyResolver {
    /// Create a resolver over the shared credential provider.
    pub fn new(credentials: Arc<AzureCredentialsProvider>) -> Self {
        Self {
            credentials,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl AccessKeyResolver for ArmAccessKeyResolver {
    async fn get_access_key(&self, arm_url: &str) -> ProviderResult<SecretValue> {
        debug!(arm_url = %arm_url, "resolving database access key via ARM");

        let credential = self.credentials.credential().await?;
        let token = credential.get_token(&[ARM_SCOPE]).await.map_err(|e| {
            ProviderError::SecretResolution {
                name: "arm-access-key".to_string(),
                message: format!("failed to acquire ARM token: {e}"),
            }
        })?;

        let url = format!(
            "{}/listKeys?api-version={}",
            arm_url.trim_end_matches('/'),
            LIST_KEYS_API_VERSION
        );
        let response = self
            .http
            .post(&url)
            .bearer_auth(token.token.secret())
            .header(reqwest::header::CONTENT_LENGTH, 0)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| ProviderError::SecretResolution {
                name: "arm-access-key".to_string(),
                message: format!("listKeys request failed: {e}"),
            })?;

        let body: serde_json::Value =
            response
                .json()
                .await
                .map_err(|e| ProviderError::SecretResolution {
                    name: "arm-access-key".to_string(),
                    message: format!("malformed listKeys response: {e}"),
                })?;

        let key = body
            .get("primaryMasterKey")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| ProviderError::SecretResolution {
                name: "arm-access-key".to_string(),
                message: "listKeys response has no primaryMasterKey".to_string(),
            })?;

        Ok(SecretValue::from_string(key.to_string()))
    }
}

// ============================================================================
// Registry assembly
// ============================================================================

/// Extract the account name from a document database endpoint URL.
///
/// `https://myaccount.documents.azure.com:443/` yields `myaccount`.
fn account_from_endpoint(endpoint: &str) -> ProviderResult<String> {
    let url = Url::parse(endpoint).map_err(|e| ProviderError::Construction {
        resource: DOCUMENT_CLIENT_KEY.to_string(),
        message: format!("invalid endpoint '{endpoint}': {e}"),
    })?;
    let host = url.host_str().ok_or_else(|| ProviderError::Construction {
        resource: DOCUMENT_CLIENT_KEY.to_string(),
        message: format!("endpoint '{endpoint}' has no host"),
    })?;
    let account = host.split('.').next().unwrap_or(host);
    Ok(account.to_string())
}

/// Assemble the production registry.
///
/// All clients authenticate through one shared credential. Nothing talks to
/// Azure here; every network interaction is deferred to the first `get` of
/// the respective slot.
pub fn azure_client_registry(
    method: AuthenticationMethod,
) -> ProviderResult<AzureClientRegistry> {
    let credentials = Arc::new(AzureCredentialsProvider::new(method));

    let vault = {
        let credentials = Arc::clone(&credentials);
        vault_client_provider(move |vault_url: String| {
            let credentials = Arc::clone(&credentials);
            async move {
                let credential: Arc<dyn TokenCredential> = credentials.credential().await?;
                SecretClient::new(&vault_url, credential).map_err(|e| {
                    ProviderError::Construction {
                        resource: "vault-client".to_string(),
                        message: e.to_string(),
                    }
                })
            }
        })?
    };

    let secrets: Arc<dyn SecretStore> = Arc::new(KeyVaultSecretStore::new(Arc::clone(&vault)));
    let access_keys: Arc<dyn AccessKeyResolver> =
        Arc::new(ArmAccessKeyResolver::new(Arc::clone(&credentials)));

    let blob_credentials = Arc::clone(&credentials);
    let queue_credentials = Arc::clone(&credentials);

    ClientRegistry::new(
        secrets,
        access_keys,
        vault,
        move |endpoint: BlobEndpoint| {
            let credentials = Arc::clone(&blob_credentials);
            async move {
                let credential: Arc<dyn TokenCredential> = credentials.credential().await?;
                Ok(BlobServiceClient::new(
                    endpoint.account,
                    StorageCredentials::token_credential(credential),
                ))
            }
        },
        move |endpoint: QueueEndpoint| {
            let credentials = Arc::clone(&queue_credentials);
            async move {
                let credential: Arc<dyn TokenCredential> = credentials.credential().await?;
                Ok(QueueServiceClient::new(
                    endpoint.account,
                    StorageCredentials::token_credential(credential),
                ))
            }
        },
        |options: DocumentClientOptions| async move {
            let account = account_from_endpoint(&options.endpoint)?;
            let token = AuthorizationToken::primary_key(&options.key).map_err(|e| {
                ProviderError::Construction {
                    resource: DOCUMENT_CLIENT_KEY.to_string(),
                    message: format!("invalid access key: {e}"),
                }
            })?;
            Ok(CosmosClient::new(account, token))
        },
    )
}

#[cfg(test)]
#[path = "azure_registry_tests.rs"]
mod tests;
