use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in apivault.
#[derive(Debug, Error)]
pub enum ApiVaultError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Invalid key — wrong password or the vault file is corrupted")]
    InvalidKey,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Vault file errors ---
    #[error("Vault not found at {0} (run `apivault init` first)")]
    VaultNotFound(PathBuf),

    #[error("Vault already exists at {0}")]
    VaultAlreadyExists(PathBuf),

    #[error("Invalid vault format: {0}")]
    InvalidVaultFormat(String),

    // --- Entry errors ---
    #[error("API entry '{0}' already exists (use `set` to change its key)")]
    DuplicateName(String),

    #[error("API entry {0} not found")]
    NotFound(String),

    #[error("Invalid entry name: {0}")]
    InvalidName(String),

    #[error("Invalid API key for '{0}': line breaks and control characters are not allowed")]
    InvalidSecret(String),

    // --- Propagation errors ---
    #[error("{tool}: {reason}")]
    ToolPropagationFailure { tool: String, reason: String },

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Password cannot be empty")]
    EmptyPassword,

    #[error("Password mismatch — passwords do not match")]
    PasswordMismatch,
}

impl ApiVaultError {
    /// Build a propagation failure for `tool` from any displayable cause.
    pub fn tool_failure(tool: &str, reason: impl std::fmt::Display) -> Self {
        Self::ToolPropagationFailure {
            tool: tool.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Convenience type alias for apivault results.
pub type Result<T> = std::result::Result<T, ApiVaultError>;
