//! Integration tests for the apivault vault module.

use std::fs;

use apivault::crypto::{self, KdfParams};
use apivault::vault::format::{self, VaultHeader, CURRENT_VERSION};
use apivault::vault::{EntrySelector, Vault, VaultCodec, VaultStore};
use apivault::ApiVaultError;
use chrono::{Duration, Utc};
use tempfile::TempDir;

fn fast() -> KdfParams {
    KdfParams {
        memory_kib: 8192,
        iterations: 1,
        parallelism: 1,
    }
}

/// Helper: a codec pointing into a fresh temp dir.
fn codec() -> (TempDir, VaultCodec) {
    let dir = TempDir::new().expect("create temp dir");
    let codec = VaultCodec::new(dir.path().join("apikeys.vault"));
    (dir, codec)
}

fn sample_vault() -> Vault {
    let mut store = VaultStore::new();
    store
        .add_entry("shodan_api", "abc123", ["Spiderfoot", "Recon-NG"])
        .unwrap();
    store.add_entry("github_api", "", ["theHarvester"]).unwrap();
    store.add_entry("hunter_api", "h-1", Vec::<String>::new()).unwrap();
    store.into_vault()
}

// ---------------------------------------------------------------------------
// Round trip
// ---------------------------------------------------------------------------

#[test]
fn encrypt_then_decrypt_with_same_password() {
    let (_dir, codec) = codec();
    let vault = sample_vault();

    let key = codec.new_key(b"Sn0w!", &fast()).unwrap();
    codec.encrypt(&vault, &key).unwrap();

    let reopened = codec.derive_key(b"Sn0w!").unwrap();
    assert_eq!(codec.decrypt(&reopened).unwrap(), vault);
}

#[test]
fn empty_vault_round_trips() {
    let (_dir, codec) = codec();
    let key = codec.new_key(b"pw", &fast()).unwrap();
    codec.encrypt(&Vault::new(), &key).unwrap();

    let vault = codec.decrypt(&codec.derive_key(b"pw").unwrap()).unwrap();
    assert!(vault.is_empty());
}

#[test]
fn order_survives_a_round_trip() {
    let (_dir, codec) = codec();
    let key = codec.new_key(b"pw", &fast()).unwrap();
    codec.encrypt(&sample_vault(), &key).unwrap();

    let vault = codec.decrypt(&key).unwrap();
    let names: Vec<_> = vault.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["shodan_api", "github_api", "hunter_api"]);
}

// ---------------------------------------------------------------------------
// Wrong password and tampering
// ---------------------------------------------------------------------------

#[test]
fn wrong_password_is_invalid_key() {
    let (_dir, codec) = codec();
    let key = codec.new_key(b"Sn0w!", &fast()).unwrap();
    codec.encrypt(&sample_vault(), &key).unwrap();

    let wrong = codec.derive_key(b"Sn0w?").unwrap();
    assert!(matches!(codec.decrypt(&wrong), Err(ApiVaultError::InvalidKey)));
}

#[test]
fn key_for_another_vault_is_invalid_key() {
    let (_dir, codec) = codec();
    let key = codec.new_key(b"pw", &fast()).unwrap();
    codec.encrypt(&sample_vault(), &key).unwrap();

    // Same password, different salt.
    let other = codec.new_key(b"pw", &fast()).unwrap();
    assert!(matches!(codec.decrypt(&other), Err(ApiVaultError::InvalidKey)));
}

#[test]
fn flipped_ciphertext_byte_is_invalid_key() {
    let (_dir, codec) = codec();
    let key = codec.new_key(b"pw", &fast()).unwrap();
    codec.encrypt(&sample_vault(), &key).unwrap();

    let mut bytes = fs::read(codec.path()).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0x80;
    fs::write(codec.path(), &bytes).unwrap();

    assert!(matches!(codec.decrypt(&key), Err(ApiVaultError::InvalidKey)));
}

#[test]
fn edited_header_is_invalid_key() {
    let (_dir, codec) = codec();
    let key = codec.new_key(b"pw", &fast()).unwrap();
    codec.encrypt(&sample_vault(), &key).unwrap();

    // Re-wrap the same ciphertext under a header with a different date.
    let raw = format::read_vault(codec.path()).unwrap();
    let mut header = raw.header.clone();
    header.created_at = header.created_at - Duration::days(1);
    let header_bytes = format::encode_header(&header).unwrap();
    format::write_vault(codec.path(), &header_bytes, &raw.sealed).unwrap();

    assert!(matches!(codec.decrypt(&key), Err(ApiVaultError::InvalidKey)));
}

#[test]
fn garbage_file_is_invalid_key() {
    let (_dir, codec) = codec();
    fs::write(codec.path(), b"definitely not a vault").unwrap();
    assert!(matches!(codec.derive_key(b"pw"), Err(ApiVaultError::InvalidKey)));
}

#[test]
fn foreign_file_is_invalid_key_for_derive_and_decrypt() {
    let (_dir, codec) = codec();
    let key = codec.new_key(b"pw", &fast()).unwrap();
    // A Fernet token from an older keyring format.
    fs::write(
        codec.path(),
        b"gAAAAABl3x1vQ2m9c8c1ZkVJbWZpcXh1b2d0a3pQ3lQb1F4bGxrY2J2Y3pQ==",
    )
    .unwrap();

    assert!(matches!(codec.derive_key(b"pw"), Err(ApiVaultError::InvalidKey)));
    assert!(matches!(codec.decrypt(&key), Err(ApiVaultError::InvalidKey)));
}

#[test]
fn truncated_vault_is_invalid_key() {
    let (_dir, codec) = codec();
    let key = codec.new_key(b"pw", &fast()).unwrap();
    codec.encrypt(&sample_vault(), &key).unwrap();

    let bytes = fs::read(codec.path()).unwrap();
    fs::write(codec.path(), &bytes[..20]).unwrap();

    assert!(matches!(codec.derive_key(b"pw"), Err(ApiVaultError::InvalidKey)));
    assert!(matches!(codec.decrypt(&key), Err(ApiVaultError::InvalidKey)));
}

#[test]
fn runaway_kdf_params_in_header_are_invalid_key() {
    let (_dir, codec) = codec();
    let key = codec.new_key(b"pw", &fast()).unwrap();
    codec.encrypt(&sample_vault(), &key).unwrap();

    let raw = format::read_vault(codec.path()).unwrap();
    let mut header = raw.header.clone();
    header.kdf.memory_kib = u32::MAX;
    header.kdf.iterations = u32::MAX;
    let header_bytes = format::encode_header(&header).unwrap();
    format::write_vault(codec.path(), &header_bytes, &raw.sealed).unwrap();

    assert!(matches!(codec.derive_key(b"pw"), Err(ApiVaultError::InvalidKey)));
}

#[test]
fn missing_vault_is_not_found() {
    let (_dir, codec) = codec();
    assert!(!codec.exists());
    assert!(matches!(
        codec.derive_key(b"pw"),
        Err(ApiVaultError::VaultNotFound(_))
    ));
}

#[test]
fn duplicate_names_in_payload_are_rejected() {
    let (_dir, codec) = codec();
    let key = codec.new_key(b"pw", &fast()).unwrap();

    let now = Utc::now();
    let header = VaultHeader {
        version: CURRENT_VERSION,
        salt: key.salt().to_vec(),
        kdf: *key.kdf(),
        created_at: now,
        updated_at: now,
    };
    let header_bytes = format::encode_header(&header).unwrap();
    let payload = br#"{"shodan_api":{"key":"a","inTools":[]},"shodan_api":{"key":"b","inTools":[]}}"#;
    let sealed = crypto::encrypt(key.payload_key().unwrap().as_slice(), payload, &header_bytes)
        .unwrap();
    format::write_vault(codec.path(), &header_bytes, &sealed).unwrap();

    assert!(matches!(
        codec.decrypt(&key),
        Err(ApiVaultError::InvalidKey)
    ));
}

// ---------------------------------------------------------------------------
// File layout
// ---------------------------------------------------------------------------

#[test]
fn header_carries_salt_and_params_and_keeps_created_at() {
    let (_dir, codec) = codec();
    let key = codec.new_key(b"pw", &fast()).unwrap();
    codec.encrypt(&Vault::new(), &key).unwrap();
    let first = codec.header().unwrap();

    assert_eq!(first.version, CURRENT_VERSION);
    assert_eq!(first.salt, key.salt());
    assert_eq!(first.kdf, fast());

    codec.encrypt(&sample_vault(), &key).unwrap();
    let second = codec.header().unwrap();
    assert_eq!(second.created_at, first.created_at);
    assert!(second.updated_at >= first.updated_at);
}

#[test]
fn file_starts_with_magic_and_leaves_no_temp_file() {
    let (dir, codec) = codec();
    let key = codec.new_key(b"pw", &fast()).unwrap();
    codec.encrypt(&sample_vault(), &key).unwrap();

    let bytes = fs::read(codec.path()).unwrap();
    assert_eq!(&bytes[..4], b"AKVT");
    assert_eq!(bytes[4], CURRENT_VERSION);
    assert!(!dir.path().join(".apikeys.vault.tmp").exists());

    // The secret never appears in the clear.
    assert!(!bytes.windows(6).any(|w| w == b"abc123"));
}

#[cfg(unix)]
#[test]
fn vault_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, codec) = codec();
    let key = codec.new_key(b"pw", &fast()).unwrap();
    codec.encrypt(&Vault::new(), &key).unwrap();

    let mode = fs::metadata(codec.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

// ---------------------------------------------------------------------------
// Store edits persisted through the codec
// ---------------------------------------------------------------------------

#[test]
fn add_remove_and_update_survive_reopen() {
    let (_dir, codec) = codec();
    let key = codec.new_key(b"pw", &fast()).unwrap();

    let mut store = VaultStore::from_vault(sample_vault());
    store.upsert_secret("github_api", "ghp_new").unwrap();
    store
        .remove_entry(&EntrySelector::Position(3))
        .unwrap();
    codec.encrypt(store.vault(), &key).unwrap();

    let store = VaultStore::from_vault(codec.decrypt(&key).unwrap());
    assert_eq!(store.len(), 2);
    assert_eq!(store.get("github_api").unwrap().secret, "ghp_new");
    assert!(store.get("hunter_api").is_none());
}
