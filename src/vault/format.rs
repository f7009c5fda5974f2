//! Binary vault file format.
//!
//! A `.vault` file has this layout:
//!
//! ```text
//! [AKVT: 4 bytes][version: 1 byte][header_len: 4 bytes LE][header JSON][sealed payload]
//! ```
//!
//! - **Magic** (`AKVT`): identifies the file as an apivault vault.
//! - **Version**: format version (currently `1`).
//! - **Header length**: little-endian u32 telling us where the header
//!   JSON ends and the sealed payload begins.
//! - **Header JSON**: serialized `VaultHeader` (salt, KDF params, times).
//! - **Sealed payload**: `nonce || AES-256-GCM(payload JSON)`, with the
//!   raw header bytes as associated data.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::KdfParams;
use crate::errors::{ApiVaultError, Result};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic bytes at the start of every vault file.
const MAGIC: &[u8; 4] = b"AKVT";

/// Current binary format version.
pub const CURRENT_VERSION: u8 = 1;

/// Fixed-size prefix: 4 (magic) + 1 (version) + 4 (header_len).
const PREFIX_LEN: usize = 9;

// ---------------------------------------------------------------------------
// VaultHeader
// ---------------------------------------------------------------------------

/// Metadata stored in the clear at the beginning of a vault file.
///
/// Everything needed to re-derive the key lives here.  The header is
/// authenticated by the payload cipher, so it cannot be swapped out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultHeader {
    /// Format version.
    pub version: u8,

    /// The salt used for Argon2id key derivation (base64 in JSON).
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub salt: Vec<u8>,

    /// Argon2id parameters used to derive the key.
    pub kdf: KdfParams,

    /// When this vault was first created.
    pub created_at: DateTime<Utc>,

    /// When the vault was last written.
    pub updated_at: DateTime<Utc>,
}

/// A vault file split into its parts, with the header bytes kept
/// exactly as stored so they can be fed back in as associated data.
pub struct RawVault {
    pub header: VaultHeader,
    pub header_bytes: Vec<u8>,
    pub sealed: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Serialize a header to the exact bytes that will be written.
pub fn encode_header(header: &VaultHeader) -> Result<Vec<u8>> {
    serde_json::to_vec(header).map_err(|e| ApiVaultError::SerializationError(format!("header: {e}")))
}

/// Write a vault file to disk **atomically**.
///
/// 1. Build the binary envelope.
/// 2. Write to a temp file in the same directory.
/// 3. Rename temp file over the target path.
///
/// The rename ensures readers never see a half-written file and a crash
/// mid-write leaves the previous vault intact.
pub fn write_vault(path: &Path, header_bytes: &[u8], sealed: &[u8]) -> Result<()> {
    let header_len = u32::try_from(header_bytes.len()).map_err(|_| {
        ApiVaultError::SerializationError(format!(
            "header length {} exceeds u32::MAX",
            header_bytes.len()
        ))
    })?;

    let mut buf = Vec::with_capacity(PREFIX_LEN + header_bytes.len() + sealed.len());
    buf.extend_from_slice(MAGIC); // 4 bytes
    buf.push(CURRENT_VERSION); // 1 byte
    buf.extend_from_slice(&header_len.to_le_bytes()); // 4 bytes LE
    buf.extend_from_slice(header_bytes);
    buf.extend_from_slice(sealed);

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    atomic_write(path, &buf)?;
    restrict_permissions(path);

    Ok(())
}

/// Read a vault file and split it into header and sealed payload.
pub fn read_vault(path: &Path) -> Result<RawVault> {
    if !path.exists() {
        return Err(ApiVaultError::VaultNotFound(path.to_path_buf()));
    }

    let data = fs::read(path)?;

    if data.len() < PREFIX_LEN {
        return Err(ApiVaultError::InvalidVaultFormat(
            "file too small to be a valid vault".into(),
        ));
    }

    if &data[0..4] != MAGIC {
        return Err(ApiVaultError::InvalidVaultFormat(
            "missing AKVT magic bytes".into(),
        ));
    }

    let version = data[4];
    if version != CURRENT_VERSION {
        return Err(ApiVaultError::InvalidVaultFormat(format!(
            "unsupported version {version}, expected {CURRENT_VERSION}"
        )));
    }

    let header_len_u32 = u32::from_le_bytes([data[5], data[6], data[7], data[8]]);
    let header_len = usize::try_from(header_len_u32).map_err(|_| {
        ApiVaultError::InvalidVaultFormat(format!(
            "header length {header_len_u32} exceeds platform address space"
        ))
    })?;

    let header_end = PREFIX_LEN
        .checked_add(header_len)
        .filter(|end| *end <= data.len())
        .ok_or_else(|| {
            ApiVaultError::InvalidVaultFormat("header length exceeds file size".into())
        })?;

    let header_bytes = data[PREFIX_LEN..header_end].to_vec();
    let sealed = data[header_end..].to_vec();

    let header: VaultHeader = serde_json::from_slice(&header_bytes)
        .map_err(|e| ApiVaultError::InvalidVaultFormat(format!("header JSON: {e}")))?;

    Ok(RawVault {
        header,
        header_bytes,
        sealed,
    })
}

/// Replace `path` with `contents` via a sibling temp file and rename.
///
/// Shared by the vault writer and the tool config writers.
pub fn atomic_write(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    fs::write(&tmp_path, contents)?;
    // Keep the mode of the file being replaced (scripts stay executable).
    if let Ok(meta) = fs::metadata(path) {
        let _ = fs::set_permissions(&tmp_path, meta.permissions());
    }
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}

/// Owner-only permissions on the vault file.  Best effort.
fn restrict_permissions(path: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    #[cfg(not(unix))]
    let _ = path;
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&BASE64.encode(data))
}

fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}
