//! The session key and its HKDF-SHA256 sub-key.
//!
//! The Argon2id output is the master key.  The payload cipher never sees
//! it directly: HKDF (RFC 5869) expands it under a fixed context string
//! into the key that actually encrypts the vault payload.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroizing;

use super::kdf::{derive_key, generate_salt, KdfParams, KEY_LEN};
use crate::errors::{ApiVaultError, Result};

/// HKDF `info` for the payload encryption key.
const PAYLOAD_KEY_INFO: &[u8] = b"apivault-payload-key";

/// Expand `ikm` into a 32-byte sub-key bound to `info`.
///
/// `salt` is `None`: the input already has high entropy (it came from
/// Argon2id), so the extract step only needs its zero-filled default.
pub fn hkdf_derive(ikm: &[u8], info: &[u8]) -> Result<[u8; KEY_LEN]> {
    let hk = Hkdf::<Sha256>::new(None, ikm);

    let mut okm = [0u8; KEY_LEN];
    hk.expand(info, &mut okm)
        .map_err(|e| ApiVaultError::KeyDerivationFailed(format!("HKDF expand failed: {e}")))?;

    Ok(okm)
}

/// A password-derived key together with the salt and cost parameters
/// that produced it.
///
/// This is what an unlocked session holds instead of the password.  The
/// key bytes are zeroed when the value is dropped.
pub struct VaultKey {
    master: Zeroizing<[u8; KEY_LEN]>,
    salt: Vec<u8>,
    kdf: KdfParams,
}

impl VaultKey {
    /// Derive a key from `password` using an existing salt (unlock path).
    pub fn derive(password: &[u8], salt: &[u8], kdf: KdfParams) -> Result<Self> {
        let master = Zeroizing::new(derive_key(password, salt, &kdf)?);
        Ok(Self {
            master,
            salt: salt.to_vec(),
            kdf,
        })
    }

    /// Derive a key from `password` under a freshly generated salt
    /// (vault creation and password change).
    pub fn generate(password: &[u8], kdf: KdfParams) -> Result<Self> {
        let salt = generate_salt();
        Self::derive(password, &salt, kdf)
    }

    /// The salt stored in the vault header.
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// The Argon2id parameters stored in the vault header.
    pub fn kdf(&self) -> &KdfParams {
        &self.kdf
    }

    /// Derive the AES-256-GCM key for the vault payload.
    pub fn payload_key(&self) -> Result<Zeroizing<[u8; KEY_LEN]>> {
        hkdf_derive(self.master.as_slice(), PAYLOAD_KEY_INFO).map(Zeroizing::new)
    }
}

impl std::fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultKey")
            .field("master", &"[REDACTED]")
            .field("kdf", &self.kdf)
            .finish()
    }
}
