//! Tests for the override-or-resolve input resolution.
//!
//! Tests that mutate process environment variables are serialized with
//! `serial_test` and clean up after themselves.

use super::*;
use crate::adapters::memory_secret_store::InMemorySecretStore;
use async_trait::async_trait;
use serial_test::serial;

fn clear_env() {
    std::env::remove_var(STORAGE_ACCOUNT_ENV);
    std::env::remove_var(KEY_VAULT_URL_ENV);
    std::env::remove_var(DOCUMENT_DB_URL_ENV);
    std::env::remove_var(DOCUMENT_DB_KEY_ENV);
}

fn store_with(entries: &[(&str, &str)]) -> InMemorySecretStore {
    let store = InMemorySecretStore::new();
    for (name, value) in entries {
        store.insert(
            SecretName::new(*name).unwrap(),
            SecretValue::from_string((*value).to_string()),
        );
    }
    store
}

struct FixedKeyResolver {
    expected_arm_url: String,
    key: String,
}

#[async_trait]
impl AccessKeyResolver for FixedKeyResolver {
    async fn get_access_key(&self, arm_url: &str) -> ProviderResult<SecretValue> {
        assert_eq!(arm_url, self.expected_arm_url);
        Ok(SecretValue::from_string(self.key.clone()))
    }
}

#[test]
fn test_endpoint_derivation() {
    let blob = blob_endpoint("teststorage");
    assert_eq!(blob.account, "teststorage");
    assert_eq!(blob.url, "https://teststorage.blob.core.windows.net");

    let queue = queue_endpoint("teststorage");
    assert_eq!(queue.account, "teststorage");
    assert_eq!(queue.url, "https://teststorage.queue.core.windows.net");
}

#[test]
fn test_document_options_debug_redacts_key() {
    let options = DocumentClientOptions {
        endpoint: "https://db.example".to_string(),
        key: "abc123".to_string(),
    };

    let debug_output = format!("{:?}", options);
    assert!(debug_output.contains("https://db.example"));
    assert!(!debug_output.contains("abc123"));
}

#[tokio::test]
#[serial]
async fn test_storage_account_override_skips_secret_store() {
    clear_env();
    std::env::set_var(STORAGE_ACCOUNT_ENV, "overridden-account");

    let store = store_with(&[(well_known::STORAGE_ACCOUNT_NAME, "vault-account")]);
    let account = resolve_storage_account(&store).await.unwrap();

    assert_eq!(account, "overridden-account");
    assert_eq!(store.total_calls(), 0);
    clear_env();
}

#[tokio::test]
#[serial]
async fn test_storage_account_falls_back_to_secret() {
    clear_env();

    let store = store_with(&[(well_known::STORAGE_ACCOUNT_NAME, "vault-account")]);
    let account = resolve_storage_account(&store).await.unwrap();

    assert_eq!(account, "vault-account");
    assert_eq!(
        store.call_count(well_known::STORAGE_ACCOUNT_NAME),
        1
    );
}

#[tokio::test]
#[serial]
async fn test_vault_url_requires_env() {
    clear_env();
    assert_eq!(
        vault_url().unwrap_err(),
        ProviderError::MissingConfiguration {
            variable: KEY_VAULT_URL_ENV.to_string()
        }
    );

    std::env::set_var(KEY_VAULT_URL_ENV, "https://vault.example");
    assert_eq!(vault_url().unwrap(), "https://vault.example");
    clear_env();
}

#[tokio::test]
#[serial]
async fn test_document_override_used_verbatim() {
    clear_env();
    std::env::set_var(DOCUMENT_DB_URL_ENV, "http://x");
    std::env::set_var(DOCUMENT_DB_KEY_ENV, "abc123");

    let store = store_with(&[]);
    let resolver = FixedKeyResolver {
        expected_arm_url: "unused".to_string(),
        key: "unused".to_string(),
    };

    let options = resolve_document_options(&store, &resolver).await.unwrap();

    assert_eq!(options.endpoint, "http://x");
    assert_eq!(options.key, "abc123");
    assert_eq!(store.total_calls(), 0);
    clear_env();
}

#[tokio::test]
#[serial]
async fn test_partial_document_override_falls_through() {
    clear_env();
    std::env::set_var(DOCUMENT_DB_URL_ENV, "http://x");
    // COSMOS_DB_KEY deliberately unset: the secret chain must be used.

    let store = store_with(&[
        (well_known::DOCUMENT_DB_URL, "https://y"),
        (well_known::DOCUMENT_DB_ARM_URL, "https://z"),
    ]);
    let resolver = FixedKeyResolver {
        expected_arm_url: "https://z".to_string(),
        key: "key999".to_string(),
    };

    let options = resolve_document_options(&store, &resolver).await.unwrap();

    assert_eq!(options.endpoint, "https://y");
    assert_eq!(options.key, "key999");
    clear_env();
}

#[tokio::test]
#[serial]
async fn test_document_secret_chain() {
    clear_env();

    let store = store_with(&[
        (well_known::DOCUMENT_DB_URL, "https://y"),
        (well_known::DOCUMENT_DB_ARM_URL, "https://z"),
    ]);
    let resolver = FixedKeyResolver {
        expected_arm_url: "https://z".to_string(),
        key: "key999".to_string(),
    };

    let options = resolve_document_options(&store, &resolver).await.unwrap();

    assert_eq!(options.endpoint, "https://y");
    assert_eq!(options.key, "key999");
    assert_eq!(store.call_count(well_known::DOCUMENT_DB_URL), 1);
    assert_eq!(store.call_count(well_known::DOCUMENT_DB_ARM_URL), 1);
}

#[tokio::test]
#[serial]
async fn test_missing_secret_rejects() {
    clear_env();

    let store = store_with(&[]);
    let resolver = FixedKeyResolver {
        expected_arm_url: "unused".to_string(),
        key: "unused".to_string(),
    };

    let error = resolve_document_options(&store, &resolver)
        .await
        .unwrap_err();
    assert!(matches!(error, ProviderError::SecretResolution { .. }));
}
