//! Error types for resource resolution and construction.
//!
//! `ProviderError` is `Clone` because a failed singleton construction is
//! cached: every later call on a poisoned provider returns a clone of the
//! original error.

/// Standard result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur while resolving inputs for, or constructing, a
/// cloud service client handle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// A required environment variable is not set and no secret-store
    /// fallback exists for it.
    #[error("Required environment variable is not set: {variable}")]
    MissingConfiguration { variable: String },

    /// The secret store could not produce a required secret.
    #[error("Failed to resolve secret '{name}': {message}")]
    SecretResolution { name: String, message: String },

    /// The injected construction factory failed to build the client handle.
    #[error("Failed to construct resource '{resource}': {message}")]
    Construction { resource: String, message: String },

    /// A resource key failed validation.
    #[error("Invalid resource key '{value}': {reason}")]
    InvalidResourceKey { value: String, reason: String },

    /// A secret name failed validation.
    #[error("Invalid secret name '{name}': {reason}")]
    InvalidSecretName { name: String, reason: String },
}

impl ProviderError {
    /// Check whether the error stems from missing or invalid configuration
    /// rather than a runtime collaborator failure.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ProviderError::MissingConfiguration { .. }
                | ProviderError::InvalidResourceKey { .. }
                | ProviderError::InvalidSecretName { .. }
        )
    }
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
