//! `apivault supported-tools`: show every tool and where its keys go.

use comfy_table::{ContentArrangement, Table};

use crate::cli::{load_settings, Cli};
use crate::errors::Result;
use crate::propagate::{Propagator, KNOWN_TOOLS};

/// Execute the `supported-tools` command.  No password is needed.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings(cli)?;
    let propagator = Propagator::from_paths(&settings.tools);

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Tool", "Key location"]);

    for tool in KNOWN_TOOLS {
        let target = propagator
            .writers()
            .find(|w| w.tool() == *tool)
            .map(|w| w.target())
            .unwrap_or_else(|| "(reads keys itself; nothing to write)".to_string());
        table.add_row(vec![tool.to_string(), target]);
    }

    println!("{table}");
    Ok(())
}
