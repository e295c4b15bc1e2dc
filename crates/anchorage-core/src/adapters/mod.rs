//! Infrastructure adapter implementations.
//!
//! The in-memory secret store is always available and backs tests and local
//! development. Production Azure implementations are compiled behind the
//! `azure` cargo feature.

pub mod memory_secret_store;

#[cfg(feature = "azure")]
pub mod azure_credentials;

#[cfg(feature = "azure")]
pub mod azure_registry;

#[cfg(feature = "azure")]
pub mod azure_secret_store;

pub use memory_secret_store::InMemorySecretStore;

#[cfg(feature = "azure")]
pub use azure_credentials::AzureCredentialsProvider;

#[cfg(feature = "azure")]
pub use azure_registry::{azure_client_registry, ArmAccessKeyResolver, AzureClientRegistry};

#[cfg(feature = "azure")]
pub use azure_secret_store::KeyVaultSecretStore;
