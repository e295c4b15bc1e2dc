//! Authentication method selection for cloud credentials.

/// How the process authenticates against the cloud platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticationMethod {
    /// Managed identity of the hosting VM or app service.
    ManagedIdentity,

    /// Service principal from environment credentials. Used for local
    /// debugging where no managed identity endpoint exists.
    ServicePrincipal,
}

impl AuthenticationMethod {
    /// Pick the method for the current build.
    ///
    /// Debug builds run on developer machines and use service principal
    /// credentials; release builds assume a managed identity endpoint.
    pub fn detect() -> Self {
        if cfg!(debug_assertions) {
            AuthenticationMethod::ServicePrincipal
        } else {
            AuthenticationMethod::ManagedIdentity
        }
    }
}

#[cfg(test)]
#[path = "credentials_tests.rs"]
mod tests;
