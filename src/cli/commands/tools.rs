//! `apivault tools`: replace the tool list of an entry.

use crate::cli::output;
use crate::cli::{load_settings, open_session, resolve_tools, Cli};
use crate::errors::Result;
use crate::propagate::Propagator;

/// Execute the `tools` command.
pub fn execute(cli: &Cli, name: &str, tools: &[String], no_sync: bool) -> Result<()> {
    let tools = resolve_tools(tools)?;

    let settings = load_settings(cli)?;
    let mut session = open_session(&settings)?;

    session.set_tools(name, tools.iter().copied())?;

    if no_sync {
        session.save()?;
    } else {
        let reports = session.save_and_propagate(&Propagator::from_paths(&settings.tools))?;
        output::print_tool_reports(&reports);
    }

    if tools.is_empty() {
        output::success(&format!("'{name}' is no longer pushed to any tool"));
    } else {
        output::success(&format!("'{name}' is used by {}", tools.join(", ")));
    }

    Ok(())
}
