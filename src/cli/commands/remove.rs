//! `apivault remove`: delete an entry by name or list position.
//!
//! Tool configs are left as they are; run `apivault set <NAME> ""` first
//! to erase the key from them.

use crate::cli::output;
use crate::cli::{confirm, load_settings, open_session, Cli};
use crate::errors::Result;
use crate::vault::EntrySelector;

/// Execute the `remove` command.
pub fn execute(cli: &Cli, entry: &str, force: bool) -> Result<()> {
    let selector: EntrySelector = match entry.parse() {
        Ok(selector) => selector,
        Err(never) => match never {},
    };

    let settings = load_settings(cli)?;
    let mut session = open_session(&settings)?;

    // Unless --force is set, ask for confirmation before deleting.
    if !force && !confirm(&format!("Remove entry {selector}?"))? {
        output::info("Cancelled.");
        return Ok(());
    }

    let removed = session.remove_entry(&selector)?;
    session.save()?;

    output::success(&format!(
        "Removed '{}' ({} left)",
        removed.name,
        session.store().len()
    ));

    Ok(())
}
