//! Integration tests for the credential store and selectors
//!
//! Exercises the registry invariants end to end: record-count lockstep
//! across create/import, masking, default resolution, case-insensitive
//! lookup, import validation, and the export/import round trip.

use coti_core::{
    BackupAccount, BackupDocument, CotiError, Credential, CredentialStore, MockWalletClient,
    Network, NetworkSelector, SwitchOutcome, MASK_PLACEHOLDER, PENDING_AES_KEY, REDACTED,
};

fn record(address: &str, signing: &str, aes: &str) -> Credential {
    Credential {
        address: address.to_string(),
        signing_key: signing.to_string(),
        symmetric_key: aes.to_string(),
    }
}

fn seeded_store() -> CredentialStore {
    CredentialStore::from_records(
        vec![
            record("0xAAA0000000000000000000000000000000000001", "0xkey1aaaa", "aeskey1xx"),
            record("0xBBB0000000000000000000000000000000000002", "0xkey2bbbb", "aeskey2xx"),
        ],
        None,
    )
}

fn backup_entry(address: &str, signing: &str, aes: &str, is_default: bool) -> BackupAccount {
    BackupAccount {
        address: address.to_string(),
        private_key: signing.to_string(),
        aes_key: aes.to_string(),
        is_default,
    }
}

// ============================================================================
// Default resolution
// ============================================================================

#[test]
fn default_falls_back_to_first_account() {
    let store = seeded_store();
    assert_eq!(
        store.resolve(None).unwrap().address,
        "0xAAA0000000000000000000000000000000000001"
    );
}

#[test]
fn explicit_default_wins_over_first() {
    let mut store = seeded_store();
    store
        .change_default("0xBBB0000000000000000000000000000000000002")
        .unwrap();
    assert_eq!(
        store.resolve(None).unwrap().address,
        "0xBBB0000000000000000000000000000000000002"
    );
}

#[test]
fn lookup_is_case_insensitive() {
    let store = seeded_store();
    let found = store
        .resolve(Some("0xaaa0000000000000000000000000000000000001"))
        .unwrap();
    assert_eq!(found.address, "0xAAA0000000000000000000000000000000000001");
}

#[test]
fn dangling_default_pointer_is_not_found() {
    let store = CredentialStore::from_records(
        vec![record("0xA", "k", "s")],
        Some("0xGONE".to_string()),
    );
    assert!(matches!(store.resolve(None), Err(CotiError::NotFound(_))));
}

// ============================================================================
// Create / generate
// ============================================================================

#[tokio::test]
async fn create_appends_one_complete_record() {
    let client = MockWalletClient::new();
    let mut store = seeded_store();
    let before = store.len();

    let created = store.create(&client, false).await.unwrap();

    assert_eq!(store.len(), before + 1);
    assert_eq!(created.symmetric_key, PENDING_AES_KEY);
    assert!(!created.has_aes_key());
    // The new record resolves by its own address.
    assert!(store.resolve(Some(&created.address)).is_ok());
    // Default unchanged.
    assert_eq!(
        store.resolve(None).unwrap().address,
        "0xAAA0000000000000000000000000000000000001"
    );
}

#[tokio::test]
async fn create_can_take_over_default() {
    let client = MockWalletClient::new();
    let mut store = seeded_store();

    let created = store.create(&client, true).await.unwrap();
    assert_eq!(store.resolve(None).unwrap().address, created.address);
}

#[tokio::test]
async fn generate_aes_key_overwrites_in_place() {
    let client = MockWalletClient::new();
    let mut store = seeded_store();
    let created = store.create(&client, false).await.unwrap();

    let key = store
        .generate_symmetric_key(&client, &created.address)
        .await
        .unwrap();

    let refreshed = store.resolve(Some(&created.address)).unwrap();
    assert_eq!(refreshed.symmetric_key, key);
    assert!(refreshed.has_aes_key());
}

#[tokio::test]
async fn generate_aes_key_unknown_account_is_not_found() {
    let client = MockWalletClient::new();
    let mut store = seeded_store();
    let result = store.generate_symmetric_key(&client, "0xNOPE").await;
    assert!(matches!(result, Err(CotiError::NotFound(_))));
}

#[tokio::test]
async fn generate_aes_key_empty_exchange_is_generation_failed() {
    let client = MockWalletClient::with_failing_key_exchange();
    let mut store = seeded_store();
    let result = store
        .generate_symmetric_key(&client, "0xAAA0000000000000000000000000000000000001")
        .await;
    assert!(matches!(result, Err(CotiError::GenerationFailed(_))));

    // The record keeps its previous key.
    let unchanged = store
        .resolve(Some("0xAAA0000000000000000000000000000000000001"))
        .unwrap();
    assert_eq!(unchanged.symmetric_key, "aeskey1xx");
}

// ============================================================================
// Export / import
// ============================================================================

#[test]
fn export_import_round_trip_preserves_triples_and_default() {
    let mut original = seeded_store();
    original
        .change_default("0xBBB0000000000000000000000000000000000002")
        .unwrap();

    let doc = original.export(None, true);

    let mut restored = CredentialStore::new();
    let summary = restored.import(&doc, false, None).unwrap();

    assert_eq!(summary.imported, 2);
    assert_eq!(summary.total_after, 2);
    assert_eq!(
        summary.default_address.as_deref(),
        Some("0xBBB0000000000000000000000000000000000002")
    );

    for address in [
        "0xAAA0000000000000000000000000000000000001",
        "0xBBB0000000000000000000000000000000000002",
    ] {
        let a = original.resolve(Some(address)).unwrap();
        let b = restored.resolve(Some(address)).unwrap();
        assert_eq!(a.signing_key, b.signing_key);
        assert_eq!(a.symmetric_key, b.symmetric_key);
    }
}

#[test]
fn redacted_import_is_rejected_without_mutation() {
    let mut store = seeded_store();
    let doc = BackupDocument::new(vec![
        backup_entry("0xC", "0xkey3", "aes3", false),
        backup_entry("0xD", REDACTED, "aes4", false),
    ]);

    let result = store.import(&doc, true, None);
    assert!(matches!(result, Err(CotiError::InvalidBackup(_))));

    // No partial application: the first, valid entry was not applied either.
    assert_eq!(store.len(), 2);
    assert!(store.resolve(Some("0xC")).is_err());
}

#[test]
fn merge_overwrites_matching_record_in_place() {
    let mut store = CredentialStore::from_records(vec![record("0xA", "k1", "s1")], None);
    let doc = BackupDocument::new(vec![backup_entry("0xa", "k2", "s2", false)]);

    let summary = store.import(&doc, true, None).unwrap();

    assert_eq!(summary.total_after, 1);
    let merged = store.resolve(Some("0xA")).unwrap();
    assert_eq!(merged.signing_key, "k2");
    assert_eq!(merged.symmetric_key, "s2");
}

#[test]
fn merge_keeps_existing_default_over_flagged_entry() {
    let mut store = seeded_store();
    store
        .change_default("0xAAA0000000000000000000000000000000000001")
        .unwrap();

    let doc = BackupDocument::new(vec![backup_entry("0xC", "k3", "s3", true)]);
    let summary = store.import(&doc, true, None).unwrap();

    assert_eq!(
        summary.default_address.as_deref(),
        Some("0xAAA0000000000000000000000000000000000001")
    );
    assert_eq!(summary.total_after, 3);
}

#[test]
fn merge_without_existing_default_adopts_flagged_entry() {
    let mut store = seeded_store();
    let doc = BackupDocument::new(vec![backup_entry("0xC", "k3", "s3", true)]);
    let summary = store.import(&doc, true, None).unwrap();
    assert_eq!(summary.default_address.as_deref(), Some("0xC"));
}

#[test]
fn replace_prefers_explicit_default_over_flag() {
    let mut store = seeded_store();
    let doc = BackupDocument::new(vec![
        backup_entry("0xC", "k3", "s3", true),
        backup_entry("0xD", "k4", "s4", false),
    ]);

    let summary = store.import(&doc, false, Some("0xd")).unwrap();

    assert_eq!(summary.default_address.as_deref(), Some("0xD"));
    assert_eq!(summary.total_after, 2);
    // Old records are gone after a replace.
    assert!(store
        .resolve(Some("0xAAA0000000000000000000000000000000000001"))
        .is_err());
}

#[test]
fn replace_without_flag_defaults_to_first_entry() {
    let mut store = seeded_store();
    let doc = BackupDocument::new(vec![
        backup_entry("0xC", "k3", "s3", false),
        backup_entry("0xD", "k4", "s4", false),
    ]);
    let summary = store.import(&doc, false, None).unwrap();
    assert_eq!(summary.default_address.as_deref(), Some("0xC"));
}

// ============================================================================
// Listing / masking
// ============================================================================

#[test]
fn list_reports_masked_keys_and_default_flag() {
    let store = seeded_store();
    let listed = store.list();

    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].private_key, "0xke...aaaa");
    assert_eq!(listed[0].aes_key, "aesk...y1xx");
    assert!(listed[0].is_default);
    assert!(!listed[1].is_default);
}

#[test]
fn list_masks_short_secrets_entirely() {
    let store = CredentialStore::from_records(vec![record("0xA", "tiny", "k")], None);
    let listed = store.list();
    assert_eq!(listed[0].private_key, MASK_PLACEHOLDER);
    assert_eq!(listed[0].aes_key, MASK_PLACEHOLDER);
}

// ============================================================================
// Network selector
// ============================================================================

#[test]
fn network_switch_reports_already_set_on_second_call() {
    let mut selector = NetworkSelector::new(Network::Mainnet);

    assert_eq!(
        selector.switch(Network::Testnet),
        SwitchOutcome::Switched {
            from: Network::Mainnet
        }
    );
    assert_eq!(selector.switch(Network::Testnet), SwitchOutcome::AlreadyActive);
    assert_eq!(selector.current(), Network::Testnet);
}
