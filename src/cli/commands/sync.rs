//! `apivault sync`: push every key to its tools again.

use crate::cli::output;
use crate::cli::{load_settings, open_session, Cli};
use crate::errors::Result;
use crate::propagate::Propagator;

/// Execute the `sync` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings(cli)?;
    let session = open_session(&settings)?;

    let reports = session.propagate(&Propagator::from_paths(&settings.tools));
    if reports.is_empty() {
        output::info("No entry lists a tool with a writer; nothing to push.");
    }
    output::print_tool_reports(&reports);

    Ok(())
}
