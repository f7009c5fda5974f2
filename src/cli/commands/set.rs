//! `apivault set`: change the API key of an existing entry.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{load_settings, open_session, Cli};
use crate::errors::{ApiVaultError, Result};
use crate::propagate::Propagator;

/// Execute the `set` command.
pub fn execute(cli: &Cli, name: &str, value: Option<&str>, no_sync: bool) -> Result<()> {
    let settings = load_settings(cli)?;
    let mut session = open_session(&settings)?;

    if session.store().get(name).is_none() {
        return Err(ApiVaultError::NotFound(format!("'{name}'")));
    }

    // Determine the key from one of three sources.
    let secret = if let Some(v) = value {
        // Source 1: Inline value on the command line.
        output::warning("Value provided on command line — it may appear in shell history.");
        Zeroizing::new(v.to_string())
    } else if !io::stdin().is_terminal() {
        // Source 2: Piped input (stdin is not a terminal).
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        Zeroizing::new(buf.trim_end().to_string())
    } else {
        // Source 3: Interactive secure prompt (default).
        dialoguer::Password::new()
            .with_prompt(format!("Enter the new API key for {name}"))
            .allow_empty_password(true)
            .interact()
            .map(Zeroizing::new)
            .map_err(|e| ApiVaultError::CommandFailed(format!("input prompt: {e}")))?
    };

    session.upsert_secret(name, &secret)?;

    if no_sync {
        session.save()?;
    } else {
        let reports = session.save_and_propagate(&Propagator::from_paths(&settings.tools))?;
        output::print_tool_reports(&reports);
    }

    output::success(&format!("API key for '{name}' updated"));

    Ok(())
}
