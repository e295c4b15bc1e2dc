//! Lazy, memoizing singleton construction for expensive resource handles.
//!
//! [`SingletonCell`] guarantees that a construction future runs at most once
//! per process: the first caller drives it, concurrent callers issued while
//! construction is pending await the same in-flight operation, and every
//! later caller receives the identical `Arc` handle.
//!
//! A failed construction poisons the cell. The error is cached and returned
//! to every subsequent caller; the build closure is never re-invoked. There
//! is no invalidation or refresh path.

use crate::errors::{ProviderError, ProviderResult};
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

// ============================================================================
// ResourceKey
// ============================================================================

/// Identifier for a class of external resource.
///
/// A resource key must consist entirely of lowercase ASCII letters, digits,
/// or hyphens (`-`). It must not be empty and is capped at 64 characters.
/// Keys appear in log events and error messages, never in URLs.
///
/// # Examples
///
/// ```rust
/// use anchorage_core::ResourceKey;
///
/// let key = ResourceKey::new("blob-client").unwrap();
/// assert_eq!(key.as_str(), "blob-client");
///
/// assert!(ResourceKey::new("").is_err());
/// assert!(ResourceKey::new("Blob Client").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceKey(String);

impl ResourceKey {
    /// Create a new `ResourceKey`, validating the character set and length.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidResourceKey`] if the value is empty,
    /// longer than 64 characters, or contains characters outside `[a-z0-9-]`.
    pub fn new(value: impl Into<String>) -> ProviderResult<Self> {
        let value = value.into();

        if value.is_empty() {
            return Err(ProviderError::InvalidResourceKey {
                value,
                reason: "resource key cannot be empty".to_string(),
            });
        }

        if value.len() > 64 {
            return Err(ProviderError::InvalidResourceKey {
                value,
                reason: "resource key exceeds 64 character limit".to_string(),
            });
        }

        if !value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(ProviderError::InvalidResourceKey {
                value,
                reason: "resource key contains invalid characters".to_string(),
            });
        }

        Ok(Self(value))
    }

    /// Return the resource key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// SingletonCell
// ============================================================================

/// One lazily-initialized slot for a shared resource handle.
///
/// Wraps [`tokio::sync::OnceCell`] so that concurrent first calls cannot
/// race into two constructions: the initialization closure is invoked by
/// exactly one caller while the others wait for its outcome.
///
/// The construction result is stored whole, success or failure. A stored
/// error makes the cell poisoned: [`SingletonCell::get_or_build`] keeps
/// returning clones of that error and never runs another build.
pub struct SingletonCell<T> {
    slot: OnceCell<Result<Arc<T>, ProviderError>>,
}

impl<T> SingletonCell<T> {
    /// Create an empty cell.
    pub const fn new() -> Self {
        Self {
            slot: OnceCell::const_new(),
        }
    }

    /// Return the memoized handle, running `build` if the cell is empty.
    ///
    /// Exactly one concurrent caller invokes `build`; the rest await the
    /// same in-flight construction and observe the identical outcome.
    ///
    /// # Errors
    ///
    /// Returns the build error, freshly produced or replayed from the
    /// poisoned slot.
    pub async fn get_or_build<F, Fut>(&self, build: F) -> ProviderResult<Arc<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ProviderResult<T>>,
    {
        self.slot
            .get_or_init(|| async move { build().await.map(Arc::new) })
            .await
            .clone()
    }

    /// Check whether construction has completed (successfully or not).
    pub fn initialized(&self) -> bool {
        self.slot.initialized()
    }
}

impl<T> Default for SingletonCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SingletonCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingletonCell")
            .field("initialized", &self.initialized())
            .finish()
    }
}

// ============================================================================
// SingletonProvider
// ============================================================================

/// A named, lazily-constructed singleton resource.
///
/// Pairs a [`ResourceKey`] with a construction closure and a
/// [`SingletonCell`]. The closure typically resolves its inputs (environment
/// override or secret chain) and then calls an injected client factory; it
/// may suspend on I/O.
///
/// Shared by `Arc` between consumers; cloning the provider is deliberately
/// not supported because two providers for one key would defeat the
/// singleton contract.
pub struct SingletonProvider<T> {
    key: ResourceKey,
    build: Box<dyn Fn() -> BoxFuture<'static, ProviderResult<T>> + Send + Sync>,
    cell: SingletonCell<T>,
}

impl<T> SingletonProvider<T> {
    /// Create a provider from a resource key and an async build closure.
    pub fn new<F, Fut>(key: ResourceKey, build: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ProviderResult<T>> + Send + 'static,
    {
        Self {
            key,
            build: Box::new(move || Box::pin(build())),
            cell: SingletonCell::new(),
        }
    }

    /// Return the singleton handle, constructing it on first use.
    ///
    /// # Errors
    ///
    /// Returns the construction error; once failed, the provider is poisoned
    /// and replays the same error without rebuilding.
    pub async fn get(&self) -> ProviderResult<Arc<T>> {
        self.cell
            .get_or_build(|| {
                debug!(resource = %self.key, "constructing resource handle");
                (self.build)()
            })
            .await
    }

    /// The key identifying this resource class.
    pub fn key(&self) -> &ResourceKey {
        &self.key
    }
}

impl<T> fmt::Debug for SingletonProvider<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingletonProvider")
            .field("key", &self.key)
            .field("initialized", &self.cell.initialized())
            .finish()
    }
}

#[cfg(test)]
#[path = "singleton_tests.rs"]
mod tests;
