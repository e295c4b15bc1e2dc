//! Secret names, secure secret values, and the secret-store collaborator.

use crate::errors::{ProviderError, ProviderResult};
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroize;

/// Secret names the client registry resolves when no environment override
/// is present.
pub mod well_known {
    /// Storage account name shared by the blob and queue clients.
    pub const STORAGE_ACCOUNT_NAME: &str = "storage-account-name";

    /// Document database endpoint URL.
    pub const DOCUMENT_DB_URL: &str = "cosmos-db-url";

    /// ARM resource URL used to derive the document database access key.
    pub const DOCUMENT_DB_ARM_URL: &str = "cosmos-db-arm-url";
}

// ============================================================================
// SecretName
// ============================================================================

/// Secret identifier with naming convention validation.
///
/// Enforces the vault naming rules: 1-127 characters, ASCII alphanumerics
/// and hyphens only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecretName(String);

impl SecretName {
    /// Create a new secret name with validation.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidSecretName`] if the name is empty,
    /// longer than 127 characters, or contains characters outside
    /// `[A-Za-z0-9-]`.
    pub fn new(name: impl Into<String>) -> ProviderResult<Self> {
        let name = name.into();

        if name.is_empty() {
            return Err(ProviderError::InvalidSecretName {
                name,
                reason: "secret name cannot be empty".to_string(),
            });
        }

        if name.len() > 127 {
            return Err(ProviderError::InvalidSecretName {
                name,
                reason: "secret name exceeds 127 character limit".to_string(),
            });
        }

        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(ProviderError::InvalidSecretName {
                name,
                reason: "secret name contains invalid characters".to_string(),
            });
        }

        Ok(Self(name))
    }

    /// Return the secret name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SecretName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SecretName {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ============================================================================
// SecretValue
// ============================================================================

/// Secure container for a resolved secret.
///
/// The value is never included in `Debug` output and the backing memory is
/// zeroized on drop.
#[derive(Clone)]
pub struct SecretValue {
    inner: String,
}

impl SecretValue {
    /// Take ownership of a secret string.
    pub fn from_string(value: String) -> Self {
        Self { inner: value }
    }

    /// Expose the secret for immediate use.
    ///
    /// # Security
    ///
    /// The returned slice contains the actual secret. Pass it straight into
    /// the consuming API; avoid holding copies.
    pub fn expose_secret(&self) -> &str {
        &self.inner
    }

    /// Check whether the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Secret length without exposing content.
    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretValue")
            .field("length", &self.len())
            .field("value", &"[REDACTED]")
            .finish()
    }
}

impl Drop for SecretValue {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

// ============================================================================
// SecretStore
// ============================================================================

/// External secret-store collaborator.
///
/// Implementations handle provider-specific authentication and transport;
/// the registry only ever asks for a named secret. Fetch failures surface as
/// [`ProviderError::SecretResolution`] and propagate to the caller
/// untransformed (no retry, no default).
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch a secret by name.
    async fn get_secret(&self, name: &SecretName) -> ProviderResult<SecretValue>;
}

#[cfg(test)]
#[path = "secrets_tests.rs"]
mod tests;
