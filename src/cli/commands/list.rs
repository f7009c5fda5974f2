//! `apivault list`: display all entries in a table.

use crate::cli::output;
use crate::cli::{load_settings, open_session, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli, show: bool) -> Result<()> {
    let settings = load_settings(cli)?;
    let session = open_session(&settings)?;

    let entries = session.snapshot();
    output::info(&format!("{} entries in the vault", entries.len()));
    output::print_entries_table(&entries, show);

    Ok(())
}
