//! `VaultCodec`: encrypts and decrypts a whole `Vault` to one file.
//!
//! The codec knows the vault path and nothing else.  It never holds a
//! key: callers derive a `VaultKey` once and pass it to every call.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::debug;
use zeroize::Zeroizing;

use super::entry::Vault;
use super::format::{self, RawVault, VaultHeader, CURRENT_VERSION};
use crate::crypto::{self, KdfParams, VaultKey};
use crate::errors::{ApiVaultError, Result};

#[derive(Debug, Clone)]
pub struct VaultCodec {
    path: PathBuf,
}

impl VaultCodec {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path to the vault file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `true` iff a vault file is present.  Absence means first run.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the clear-text header of the existing vault.
    pub fn header(&self) -> Result<VaultHeader> {
        Ok(format::read_vault(&self.path)?.header)
    }

    /// Derive the key for the existing vault from `password`, using the
    /// salt and parameters stored in its header.
    ///
    /// This does not check the password; `decrypt` does.  A file that is
    /// not a readable vault, or whose header asks for out-of-range KDF
    /// parameters, is `InvalidKey`.
    pub fn derive_key(&self, password: &[u8]) -> Result<VaultKey> {
        let header = self.read_for_unlock()?.header;
        VaultKey::derive(password, &header.salt, header.kdf).map_err(|e| self.unreadable(e))
    }

    /// Derive a key for a new vault (or a new password) under a fresh salt.
    pub fn new_key(&self, password: &[u8], kdf: &KdfParams) -> Result<VaultKey> {
        VaultKey::generate(password, *kdf)
    }

    /// Read, authenticate and decrypt the vault.
    ///
    /// Fails with `InvalidKey` on a wrong key, any tampering, a foreign or
    /// corrupted file, or a payload that does not parse (duplicate entry
    /// names included).  Only a missing file and I/O errors differ.
    pub fn decrypt(&self, key: &VaultKey) -> Result<Vault> {
        let raw = self.read_for_unlock()?;

        if raw.header.salt != key.salt() || raw.header.kdf != *key.kdf() {
            debug!(path = %self.path.display(), "key was derived for a different vault header");
            return Err(ApiVaultError::InvalidKey);
        }

        let payload_key = key.payload_key()?;
        let plaintext = Zeroizing::new(crypto::decrypt(
            payload_key.as_slice(),
            &raw.sealed,
            &raw.header_bytes,
        )?);

        serde_json::from_slice(&plaintext).map_err(|e| {
            self.unreadable(ApiVaultError::InvalidVaultFormat(format!("payload: {e}")))
        })
    }

    fn read_for_unlock(&self) -> Result<RawVault> {
        format::read_vault(&self.path).map_err(|e| self.unreadable(e))
    }

    /// Fold every reason a file cannot be unlocked into `InvalidKey`,
    /// keeping the detail in the debug log.
    fn unreadable(&self, err: ApiVaultError) -> ApiVaultError {
        match err {
            ApiVaultError::VaultNotFound(_) | ApiVaultError::Io(_) => err,
            other => {
                debug!(path = %self.path.display(), error = %other, "vault cannot be unlocked");
                ApiVaultError::InvalidKey
            }
        }
    }

    /// Serialize, encrypt and atomically replace the vault file.
    ///
    /// The creation time of an existing vault is carried over.
    pub fn encrypt(&self, vault: &Vault, key: &VaultKey) -> Result<()> {
        let now = Utc::now();
        let created_at = format::read_vault(&self.path)
            .map(|raw| raw.header.created_at)
            .unwrap_or(now);

        let header = VaultHeader {
            version: CURRENT_VERSION,
            salt: key.salt().to_vec(),
            kdf: *key.kdf(),
            created_at,
            updated_at: now,
        };
        let header_bytes = format::encode_header(&header)?;

        let plaintext = Zeroizing::new(
            serde_json::to_vec(vault)
                .map_err(|e| ApiVaultError::SerializationError(format!("payload: {e}")))?,
        );

        let payload_key = key.payload_key()?;
        let sealed = crypto::encrypt(payload_key.as_slice(), &plaintext, &header_bytes)?;

        format::write_vault(&self.path, &header_bytes, &sealed)?;
        debug!(path = %self.path.display(), entries = vault.len(), "vault written");
        Ok(())
    }
}
