//! Tests for the in-memory secret store.

use super::*;

fn name(value: &str) -> SecretName {
    SecretName::new(value).unwrap()
}

#[tokio::test]
async fn test_returns_inserted_secret() {
    let store = InMemorySecretStore::new();
    store.insert(
        name("storage-account-name"),
        SecretValue::from_string("teststorage".to_string()),
    );

    let value = store.get_secret(&name("storage-account-name")).await.unwrap();
    assert_eq!(value.expose_secret(), "teststorage");
}

#[tokio::test]
async fn test_missing_secret_rejects() {
    let store = InMemorySecretStore::new();

    let error = store.get_secret(&name("absent")).await.unwrap_err();
    assert_eq!(
        error,
        ProviderError::SecretResolution {
            name: "absent".to_string(),
            message: "secret not found".to_string(),
        }
    );
    // The failed fetch still counts as a round trip.
    assert_eq!(store.call_count("absent"), 1);
}

#[tokio::test]
async fn test_call_counting() {
    let store = InMemorySecretStore::new();
    store.insert(
        name("cosmos-db-url"),
        SecretValue::from_string("https://y".to_string()),
    );

    assert_eq!(store.total_calls(), 0);
    store.get_secret(&name("cosmos-db-url")).await.unwrap();
    store.get_secret(&name("cosmos-db-url")).await.unwrap();

    assert_eq!(store.call_count("cosmos-db-url"), 2);
    assert_eq!(store.call_count("cosmos-db-arm-url"), 0);
    assert_eq!(store.total_calls(), 2);
}
