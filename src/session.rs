//! `VaultSession`: the unlocked vault and everything that changes it.
//!
//! Lifecycle:
//!
//! ```text
//! Uninitialized --initialize--> Locked --unlock--> VaultSession (unlocked)
//! ```
//!
//! An unlocked session owns the decrypted entries and the derived key,
//! never the password.  The key is zeroed when the session is dropped.

use subtle::ConstantTimeEq;
use tracing::info;

use crate::crypto::{KdfParams, VaultKey};
use crate::errors::{ApiVaultError, Result};
use crate::propagate::{Propagator, ToolReport};
use crate::vault::{Entry, EntrySelector, Vault, VaultCodec, VaultStore};

/// Which entry state a vault path is in before any password is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultState {
    /// No vault file yet; a new password must be chosen.
    Uninitialized,
    /// A vault file exists; its password is needed to unlock it.
    Locked,
}

pub struct VaultSession {
    codec: VaultCodec,
    key: VaultKey,
    store: VaultStore,
}

/// Reject an empty password and a confirmation that does not match.
fn check_new_password(password: &str, confirmation: &str) -> Result<()> {
    if password.is_empty() {
        return Err(ApiVaultError::EmptyPassword);
    }
    let same: bool = password.as_bytes().ct_eq(confirmation.as_bytes()).into();
    if !same {
        return Err(ApiVaultError::PasswordMismatch);
    }
    Ok(())
}

impl VaultSession {
    /// Whether `codec` points at an existing vault.
    pub fn state(codec: &VaultCodec) -> VaultState {
        if codec.exists() {
            VaultState::Locked
        } else {
            VaultState::Uninitialized
        }
    }

    /// First run: write an empty vault under a new password.
    ///
    /// The vault is left locked; call `unlock` to use it.
    pub fn initialize(
        codec: &VaultCodec,
        password: &str,
        confirmation: &str,
        kdf: &KdfParams,
    ) -> Result<()> {
        if codec.exists() {
            return Err(ApiVaultError::VaultAlreadyExists(codec.path().to_path_buf()));
        }
        check_new_password(password, confirmation)?;

        let key = codec.new_key(password.as_bytes(), kdf)?;
        codec.encrypt(&Vault::new(), &key)?;

        info!(path = %codec.path().display(), "vault created");
        Ok(())
    }

    /// Derive the key from `password` and decrypt the vault.
    ///
    /// A wrong password fails with `InvalidKey`; nothing is unlocked.
    pub fn unlock(codec: VaultCodec, password: &str) -> Result<Self> {
        let key = codec.derive_key(password.as_bytes())?;
        let vault = codec.decrypt(&key)?;

        info!(path = %codec.path().display(), entries = vault.len(), "vault unlocked");
        Ok(Self {
            codec,
            key,
            store: VaultStore::from_vault(vault),
        })
    }

    pub fn codec(&self) -> &VaultCodec {
        &self.codec
    }

    pub fn store(&self) -> &VaultStore {
        &self.store
    }

    /// Entries in display order.
    pub fn snapshot(&self) -> Vec<Entry> {
        self.store.snapshot()
    }

    // ------------------------------------------------------------------
    // Mutation (in memory only until `save`)
    // ------------------------------------------------------------------

    pub fn add_entry<I, S>(&mut self, name: &str, secret: &str, tools: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.store.add_entry(name, secret, tools)
    }

    pub fn remove_entry(&mut self, selector: &EntrySelector) -> Result<Entry> {
        self.store.remove_entry(selector)
    }

    pub fn upsert_secret(&mut self, name: &str, secret: &str) -> Result<()> {
        self.store.upsert_secret(name, secret)
    }

    pub fn set_tools<I, S>(&mut self, name: &str, tools: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.store.set_tools(name, tools)
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Re-encrypt the whole vault to disk.
    ///
    /// On failure the in-memory entries are unchanged and must not be
    /// assumed persisted.
    pub fn save(&self) -> Result<()> {
        self.codec.encrypt(self.store.vault(), &self.key)?;
        info!(entries = self.store.len(), "vault saved");
        Ok(())
    }

    /// Push current secrets to the tools without touching the vault file.
    pub fn propagate(&self, propagator: &Propagator) -> Vec<ToolReport> {
        propagator.propagate(self.store.vault().entries())
    }

    /// Save, then propagate.  Propagation failures are reported, never
    /// rolled back: the vault file is authoritative.
    pub fn save_and_propagate(&self, propagator: &Propagator) -> Result<Vec<ToolReport>> {
        self.save()?;
        Ok(self.propagate(propagator))
    }

    /// Blank every secret, save, and erase the keys from every tool.
    pub fn wipe(&mut self, propagator: &Propagator) -> Result<Vec<ToolReport>> {
        self.store.wipe_secrets();
        self.save()?;
        info!(entries = self.store.len(), "vault secrets wiped");
        Ok(self.propagate(propagator))
    }

    /// Re-encrypt the vault under a new password (and a fresh salt).
    ///
    /// The session keeps working with the new key.  If writing fails the
    /// old key stays in use and the file still opens with the old password.
    pub fn change_password(
        &mut self,
        new_password: &str,
        confirmation: &str,
        kdf: &KdfParams,
    ) -> Result<()> {
        check_new_password(new_password, confirmation)?;

        let new_key = self.codec.new_key(new_password.as_bytes(), kdf)?;
        self.codec.encrypt(self.store.vault(), &new_key)?;
        self.key = new_key;

        info!(entries = self.store.len(), "vault password changed");
        Ok(())
    }
}

impl std::fmt::Debug for VaultSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSession")
            .field("path", &self.codec.path())
            .field("entries", &self.store.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_password_policy() {
        assert!(matches!(
            check_new_password("", ""),
            Err(ApiVaultError::EmptyPassword)
        ));
        assert!(matches!(
            check_new_password("Sn0w!", "Sn0w?"),
            Err(ApiVaultError::PasswordMismatch)
        ));
        assert!(matches!(
            check_new_password("Sn0w!", "Sn0w!!"),
            Err(ApiVaultError::PasswordMismatch)
        ));
        assert!(check_new_password("Sn0w!", "Sn0w!").is_ok());
    }
}
