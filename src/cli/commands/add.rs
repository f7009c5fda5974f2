//! `apivault add`: add a new entry and push it to its tools.

use crate::cli::output;
use crate::cli::{load_settings, open_session, resolve_tools, Cli};
use crate::errors::Result;
use crate::propagate::Propagator;

/// Execute the `add` command.
pub fn execute(
    cli: &Cli,
    name: &str,
    tools: &[String],
    value: Option<&str>,
    no_sync: bool,
) -> Result<()> {
    // Validate tool names before asking for a password.
    let tools = resolve_tools(tools)?;
    if value.is_some() {
        output::warning("Value provided on command line — it may appear in shell history.");
    }

    let settings = load_settings(cli)?;
    let mut session = open_session(&settings)?;

    session.add_entry(name, value.unwrap_or_default(), tools)?;

    if no_sync {
        session.save()?;
    } else {
        let reports = session.save_and_propagate(&Propagator::from_paths(&settings.tools))?;
        output::print_tool_reports(&reports);
    }

    output::success(&format!(
        "Entry '{name}' added ({} total)",
        session.store().len()
    ));
    if value.is_none() {
        output::tip(&format!("Run `apivault set {name}` to store its API key."));
    }

    Ok(())
}
