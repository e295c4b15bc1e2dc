//! # Anchorage Core
//!
//! Lazy, memoizing singleton providers for expensive cloud service client
//! handles (blob storage, queue storage, key vault, document database).
//!
//! Each client class is represented by a [`SingletonProvider`]: the first
//! caller runs the construction future, concurrent callers await the same
//! in-flight construction, and every later caller receives the identical
//! `Arc` handle for the life of the process. A failed construction poisons
//! the provider; the cached error is returned to all future callers.
//!
//! Construction inputs are resolved through a two-tier strategy: an
//! environment-variable override is consulted first and, only when absent,
//! the named secrets are fetched from a [`SecretStore`]. Overrides never
//! trigger a secret-store round trip.
//!
//! ## Architecture
//!
//! - Business logic depends only on trait abstractions ([`SecretStore`],
//!   [`AccessKeyResolver`]); concrete client construction is injected as
//!   factory closures.
//! - The [`ClientRegistry`] is built once at startup and shared by `Arc`;
//!   there are no ambient globals.
//! - Production Azure implementations live in [`adapters`] behind the
//!   `azure` cargo feature; an in-memory secret store is always available
//!   for tests and development.

pub mod adapters;
pub mod credentials;
pub mod errors;
pub mod registry;
pub mod resolution;
pub mod secrets;
pub mod singleton;

pub use credentials::AuthenticationMethod;
pub use errors::{ProviderError, ProviderResult};
pub use registry::{vault_client_provider, ClientRegistry};
pub use resolution::{
    AccessKeyResolver, BlobEndpoint, DocumentClientOptions, QueueEndpoint,
};
pub use secrets::{SecretName, SecretStore, SecretValue};
pub use singleton::{ResourceKey, SingletonCell, SingletonProvider};
