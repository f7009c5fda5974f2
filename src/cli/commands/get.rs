//! `apivault get`: print a single API key.

use crate::cli::{load_settings, open_session, Cli};
use crate::errors::{ApiVaultError, Result};

/// Execute the `get` command.
pub fn execute(cli: &Cli, name: &str) -> Result<()> {
    let settings = load_settings(cli)?;
    let session = open_session(&settings)?;

    let entry = session
        .store()
        .get(name)
        .ok_or_else(|| ApiVaultError::NotFound(format!("'{name}'")))?;
    println!("{}", entry.secret);

    Ok(())
}
