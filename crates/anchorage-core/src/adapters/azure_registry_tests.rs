//! Tests for Azure registry assembly helpers.
//!
//! Client construction against live Azure is exercised in deployment
//! environments; these tests cover the pure helpers.

use super::*;
use crate::credentials::AuthenticationMethod;

#[test]
fn test_account_from_endpoint() {
    assert_eq!(
        account_from_endpoint("https://myaccount.documents.azure.com:443/").unwrap(),
        "myaccount"
    );
    assert_eq!(
        account_from_endpoint("https://other.documents.azure.com").unwrap(),
        "other"
    );
}

#[test]
fn test_account_from_endpoint_rejects_garbage() {
    let error = account_from_endpoint("not a url").unwrap_err();
    assert!(matches!(error, ProviderError::Construction { .. }));
}

#[test]
fn test_registry_assembly_is_lazy() {
    // Assembling the registry must not require any Azure configuration;
    // resolution happens on first get of each slot.
    let registry = azure_client_registry(AuthenticationMethod::detect()).unwrap();
    let debug_output = format!("{:?}", registry);
    assert!(debug_output.contains("vault-client"));
    assert!(debug_output.contains("db-client"));
}
