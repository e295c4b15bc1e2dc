//! Registry of singleton client providers.
//!
//! [`ClientRegistry`] is the explicit-ownership counterpart of a
//! dependency-injection container: one long-lived object holding one
//! lazily-initialized slot per client class, built once at startup and
//! shared by `Arc`. It is generic over the concrete client handle types;
//! construction is delegated to injected async factories so that tests can
//! supply stubs and the Azure adapters can supply SDK clients.
//!
//! The vault provider is created first (see [`vault_client_provider`]) and
//! passed in pre-built, because the secret store used by the other
//! resolvers is typically backed by that same vault client.

use crate::errors::ProviderResult;
use crate::resolution::{
    blob_endpoint, queue_endpoint, resolve_document_options, resolve_storage_account, vault_url,
    AccessKeyResolver, BlobEndpoint, DocumentClientOptions, QueueEndpoint,
};
use crate::secrets::SecretStore;
use crate::singleton::{ResourceKey, SingletonProvider};
use std::future::Future;
use std::sync::Arc;

/// Resource key for the blob service client slot.
pub const BLOB_CLIENT_KEY: &str = "blob-client";

/// Resource key for the queue service client slot.
pub const QUEUE_CLIENT_KEY: &str = "queue-client";

/// Resource key for the key vault client slot.
pub const VAULT_CLIENT_KEY: &str = "vault-client";

/// Resource key for the document database client slot.
pub const DOCUMENT_CLIENT_KEY: &str = "db-client";

/// Build the key vault client provider.
///
/// The vault URL comes from `KEY_VAULT_URL` (environment-only; resolution
/// happens inside the build closure, on first `get`). The provider is
/// returned in an `Arc` so it can be shared between the registry and a
/// vault-backed [`SecretStore`] implementation.
pub fn vault_client_provider<V, F, Fut>(
    factory: F,
) -> ProviderResult<Arc<SingletonProvider<V>>>
where
    V: Send + Sync + 'static,
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ProviderResult<V>> + Send + 'static,
{
    let key = ResourceKey::new(VAULT_CLIENT_KEY)?;
    Ok(Arc::new(SingletonProvider::new(key, move || {
        let url = vault_url();
        let build = match url {
            Ok(url) => Ok(factory(url)),
            Err(error) => Err(error),
        };
        async move { build?.await }
    })))
}

/// Registry holding one singleton provider per client class.
///
/// Type parameters are the concrete handle types: blob service, queue
/// service, key vault, and document database clients.
pub struct ClientRegistry<B, Q, V, D> {
    blob: SingletonProvider<B>,
    queue: SingletonProvider<Q>,
    vault: Arc<SingletonProvider<V>>,
    document: SingletonProvider<D>,
}

impl<B, Q, V, D> ClientRegistry<B, Q, V, D>
where
    B: Send + Sync + 'static,
    Q: Send + Sync + 'static,
    V: Send + Sync + 'static,
    D: Send + Sync + 'static,
{
    /// Assemble the registry from its collaborators and client factories.
    ///
    /// Nothing is constructed here: each factory runs on the first `get` of
    /// its slot, after the corresponding inputs have been resolved through
    /// the override-or-secret-chain strategy.
    pub fn new<FB, FutB, FQ, FutQ, FD, FutD>(
        secrets: Arc<dyn SecretStore>,
        access_keys: Arc<dyn AccessKeyResolver>,
        vault: Arc<SingletonProvider<V>>,
        blob_factory: FB,
        queue_factory: FQ,
        document_factory: FD,
    ) -> ProviderResult<Self>
    where
        FB: Fn(BlobEndpoint) -> FutB + Send + Sync + 'static,
        FutB: Future<Output = ProviderResult<B>> + Send + 'static,
        FQ: Fn(QueueEndpoint) -> FutQ + Send + Sync + 'static,
        FutQ: Future<Output = ProviderResult<Q>> + Send + 'static,
        FD: Fn(DocumentClientOptions) -> FutD + Send + Sync + 'static,
        FutD: Future<Output = ProviderResult<D>> + Send + 'static,
    {
        let blob = {
            let secrets = Arc::clone(&secrets);
            let factory = Arc::new(blob_factory);
            SingletonProvider::new(ResourceKey::new(BLOB_CLIENT_KEY)?, move || {
                let secrets = Arc::clone(&secrets);
                let factory = Arc::clone(&factory);
                async move {
                    let account = resolve_storage_account(secrets.as_ref()).await?;
                    factory(blob_endpoint(&account)).await
                }
            })
        };

        let queue = {
            let secrets = Arc::clone(&secrets);
            let factory = Arc::new(queue_factory);
            SingletonProvider::new(ResourceKey::new(QUEUE_CLIENT_KEY)?, move || {
                let secrets = Arc::clone(&secrets);
                let factory = Arc::clone(&factory);
                async move {
                    let account = resolve_storage_account(secrets.as_ref()).await?;
                    factory(queue_endpoint(&account)).await
                }
            })
        };

        let document = {
            let factory = Arc::new(document_factory);
            SingletonProvider::new(ResourceKey::new(DOCUMENT_CLIENT_KEY)?, move || {
                let secrets = Arc::clone(&secrets);
                let access_keys = Arc::clone(&access_keys);
                let factory = Arc::clone(&factory);
                async move {
                    let options =
                        resolve_document_options(secrets.as_ref(), access_keys.as_ref()).await?;
                    factory(options).await
                }
            })
        };

        Ok(Self {
            blob,
            queue,
            vault,
            document,
        })
    }

    /// Blob service client handle, constructed on first use.
    pub async fn blob_service(&self) -> ProviderResult<Arc<B>> {
        self.blob.get().await
    }

    /// Queue service client handle, constructed on first use.
    pub async fn queue_service(&self) -> ProviderResult<Arc<Q>> {
        self.queue.get().await
    }

    /// Key vault client handle, constructed on first use.
    pub async fn key_vault_client(&self) -> ProviderResult<Arc<V>> {
        self.vault.get().await
    }

    /// Document database client handle, constructed on first use.
    pub async fn document_client(&self) -> ProviderResult<Arc<D>> {
        self.document.get().await
    }
}

impl<B, Q, V, D> std::fmt::Debug for ClientRegistry<B, Q, V, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientRegistry")
            .field("blob", &self.blob.key().as_str())
            .field("queue", &self.queue.key().as_str())
            .field("vault", &self.vault.key().as_str())
            .field("document", &self.document.key().as_str())
            .finish()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
