//! `apivault wipe`: blank every API key, in the vault and in the tools.

use crate::cli::output;
use crate::cli::{confirm, load_settings, open_session, Cli};
use crate::errors::Result;
use crate::propagate::Propagator;

/// Execute the `wipe` command.
pub fn execute(cli: &Cli, force: bool) -> Result<()> {
    let settings = load_settings(cli)?;
    let mut session = open_session(&settings)?;

    if !force
        && !confirm(&format!(
            "Erase all {} API key(s) from the vault and every tool?",
            session.store().len()
        ))?
    {
        output::info("Cancelled.");
        return Ok(());
    }

    let reports = session.wipe(&Propagator::from_paths(&settings.tools))?;
    output::print_tool_reports(&reports);

    output::success(&format!(
        "All API keys erased ({} entries kept)",
        session.store().len()
    ));

    Ok(())
}
