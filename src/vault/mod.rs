//! Vault module: encrypted API-key storage.
//!
//! This module provides:
//! - `Entry` and `Vault` types (`entry`)
//! - Binary vault file format with atomic writes (`format`)
//! - `VaultCodec` for encrypting/decrypting the whole vault (`codec`)
//! - `VaultStore` for in-memory edits (`store`)

pub mod codec;
pub mod entry;
pub mod format;
pub mod store;

pub use codec::VaultCodec;
pub use entry::{Entry, Vault};
pub use format::VaultHeader;
pub use store::{EntrySelector, VaultStore};
