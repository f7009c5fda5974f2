//! `apivault init`: create a new, empty vault.

use crate::cli::output;
use crate::cli::{load_settings, prompt_new_password, Cli, PASSWORD_ENV};
use crate::errors::{ApiVaultError, Result};
use crate::session::{VaultSession, VaultState};
use crate::vault::VaultCodec;

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings(cli)?;
    let codec = VaultCodec::new(&settings.vault_path);

    // 1. Refuse to overwrite an existing vault.
    if VaultSession::state(&codec) == VaultState::Locked {
        output::tip("Use `apivault add` to add entries to the existing vault.");
        return Err(ApiVaultError::VaultAlreadyExists(codec.path().to_path_buf()));
    }

    // 2. Choose the password (with confirmation).
    output::info("Choose a password for the API keys file.");
    let (password, confirmation) = prompt_new_password(PASSWORD_ENV)?;

    // 3. Write the empty vault.
    VaultSession::initialize(&codec, &password, &confirmation, &settings.kdf_params())?;

    output::success(&format!("Vault created at {}", codec.path().display()));
    output::tip("Run `apivault add <NAME> --tool <TOOL>` to add an entry.");
    output::tip("Run `apivault supported-tools` to see where keys can be pushed.");

    Ok(())
}
