//! Azure credential provider with singleton caching.

use crate::credentials::AuthenticationMethod;
use crate::errors::ProviderResult;
use crate::singleton::SingletonCell;
use azure_identity::DefaultAzureCredential;
use std::sync::Arc;
use tracing::info;

/// Memoized Azure credential handle.
///
/// `DefaultAzureCredential` first looks for Azure Active Directory client
/// secret credentials in the environment:
///
/// - `AZURE_TENANT_ID`: AAD tenant ID
/// - `AZURE_CLIENT_ID`: AAD app registration (client) ID
/// - `AZURE_CLIENT_SECRET`: client secret for the app registration
///
/// If those are absent and the process runs on an Azure VM or App Service
/// instance, the managed identity endpoint is used as the fallback
/// authentication source. The credential is constructed once and shared by
/// every client provider.
pub struct AzureCredentialsProvider {
    method: AuthenticationMethod,
    cell: SingletonCell<DefaultAzureCredential>,
}

impl AzureCredentialsProvider {
    /// Create a provider for the given authentication method.
    pub fn new(method: AuthenticationMethod) -> Self {
        Self {
            method,
            cell: SingletonCell::new(),
        }
    }

    /// The authentication method this provider was configured with.
    pub fn method(&self) -> AuthenticationMethod {
        self.method
    }

    /// Return the shared credential, constructing it on first use.
    pub async fn credential(&self) -> ProviderResult<Arc<DefaultAzureCredential>> {
        let method = self.method;
        self.cell
            .get_or_build(|| async move {
                info!(?method, "creating Azure credential");
                Ok(DefaultAzureCredential::default())
            })
            .await
    }
}
