//! `apivault rotate-key`: change the vault password.
//!
//! Unlocks with the current password, then re-encrypts every entry under
//! a key derived from the new password and a fresh salt.  The file is
//! replaced atomically.

use crate::cli::output;
use crate::cli::{load_settings, open_session, prompt_new_password, Cli, NEW_PASSWORD_ENV};
use crate::errors::Result;

/// Execute the `rotate-key` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings(cli)?;

    // 1. Open the vault with the current password.
    output::info("Enter your current vault password.");
    let mut session = open_session(&settings)?;

    // 2. Prompt for the new password.
    output::info("Choose your new vault password.");
    let (password, confirmation) = prompt_new_password(NEW_PASSWORD_ENV)?;

    // 3. Re-encrypt under the new key.
    session.change_password(&password, &confirmation, &settings.kdf_params())?;

    output::success(&format!(
        "Password changed ({} entries re-encrypted)",
        session.store().len()
    ));

    Ok(())
}
