//! Propagation of vault secrets into external tool configs.
//!
//! Each supported tool keeps its own copy of API keys in its own format.
//! The vault is the source of truth; those copies are regenerated from it
//! by a table of `ToolWriter`s, one per tool.
//!
//! Propagation is best effort: every (entry, tool) pair is attempted and
//! a failure is recorded in its `ToolReport` without stopping the rest.

mod text;

pub mod harvester;
pub mod osint_search;
pub mod recon_ng;
pub mod script;
pub mod spiderfoot;

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::config::ToolPaths;
use crate::errors::{ApiVaultError, Result};
use crate::vault::Entry;

pub use harvester::HarvesterWriter;
pub use osint_search::OsintSearchWriter;
pub use recon_ng::ReconNgWriter;
pub use script::ScriptTokenWriter;
pub use spiderfoot::SpiderfootWriter;

pub const RECON_NG: &str = "Recon-NG";
pub const SPIDERFOOT: &str = "Spiderfoot";
pub const THE_HARVESTER: &str = "theHarvester";
pub const OSINT_SEARCH: &str = "OSINT-Search";
pub const PROJECT_HADES: &str = "Project-Hades";
pub const CSI_USERSEARCH: &str = "CSI UserSearch";

/// Every tool name an entry may list, in display order.
pub const KNOWN_TOOLS: &[&str] = &[
    OSINT_SEARCH,
    RECON_NG,
    SPIDERFOOT,
    THE_HARVESTER,
    CSI_USERSEARCH,
    PROJECT_HADES,
];

/// Map user input to the canonical spelling of a known tool.
///
/// Matching ignores case, spaces, hyphens and underscores, so
/// `recon-ng`, `reconng` and `RECON_NG` all resolve to `Recon-NG`.
pub fn canonical_tool_name(input: &str) -> Option<&'static str> {
    fn squash(s: &str) -> String {
        s.chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect()
    }
    let wanted = squash(input);
    KNOWN_TOOLS.iter().copied().find(|t| squash(t) == wanted)
}

/// What a single write did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// At least one line or row now carries the secret.
    Updated,
    /// The tool's config has no slot for this entry.
    NoMatch,
}

/// One tool's write routine.
pub trait ToolWriter {
    /// Tool name as it appears in an entry's tool list.
    fn tool(&self) -> &'static str;

    /// Human-readable description of where this writer writes.
    fn target(&self) -> String;

    /// Store `secret` (possibly empty, for erasure) under `entry_name`
    /// in the tool's config, leaving everything else as it was.
    fn write(&self, entry_name: &str, secret: &str) -> Result<WriteOutcome>;
}

/// The result of one (entry, tool) write.
#[derive(Debug)]
pub struct ToolReport {
    pub tool: String,
    pub entry: String,
    pub outcome: Result<WriteOutcome>,
}

impl ToolReport {
    pub fn is_failure(&self) -> bool {
        self.outcome.is_err()
    }
}

/// The per-tool writer table.
#[derive(Default)]
pub struct Propagator {
    writers: BTreeMap<&'static str, Box<dyn ToolWriter>>,
}

impl Propagator {
    /// A propagator with no writers; add them with `with`.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard table, with file locations from configuration.
    pub fn from_paths(paths: &ToolPaths) -> Self {
        Self::new()
            .with(ReconNgWriter::new(&paths.recon_ng_db))
            .with(SpiderfootWriter::new(&paths.spiderfoot_cfg))
            .with(HarvesterWriter::new(&paths.harvester_yaml))
            .with(OsintSearchWriter::new(&paths.osint_search_ini))
            .with(ScriptTokenWriter::new(
                PROJECT_HADES,
                &paths.hades_script,
                "atiikey",
            ))
    }

    /// Register (or replace) the writer for its tool.
    pub fn with(mut self, writer: impl ToolWriter + 'static) -> Self {
        self.writers.insert(writer.tool(), Box::new(writer));
        self
    }

    /// Registered writers in tool-name order.
    pub fn writers(&self) -> impl Iterator<Item = &dyn ToolWriter> {
        self.writers.values().map(|w| &**w)
    }

    /// Push each entry's current secret to every tool it lists.
    pub fn propagate(&self, entries: &[Entry]) -> Vec<ToolReport> {
        let mut reports = Vec::new();

        for entry in entries {
            for tool in &entry.tools {
                let Some(writer) = self.writers.get(tool.as_str()) else {
                    debug!(tool = %tool, entry = %entry.name, "no writer registered, skipping");
                    continue;
                };

                let outcome = writer
                    .write(&entry.name, &entry.secret)
                    .map_err(|e| match e {
                        failure @ ApiVaultError::ToolPropagationFailure { .. } => failure,
                        other => ApiVaultError::tool_failure(writer.tool(), other),
                    });

                match &outcome {
                    Ok(WriteOutcome::Updated) => {
                        debug!(tool = %tool, entry = %entry.name, "tool config updated");
                    }
                    Ok(WriteOutcome::NoMatch) => {
                        debug!(tool = %tool, entry = %entry.name, "no matching slot in tool config");
                    }
                    Err(e) => {
                        warn!(tool = %tool, entry = %entry.name, error = %e, "propagation failed");
                    }
                }

                reports.push(ToolReport {
                    tool: tool.clone(),
                    entry: entry.name.clone(),
                    outcome,
                });
            }
        }

        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records calls; fails for entries named `broken`.
    struct Recording {
        tool: &'static str,
        calls: Rc<RefCell<Vec<(String, String)>>>,
    }

    impl ToolWriter for Recording {
        fn tool(&self) -> &'static str {
            self.tool
        }

        fn target(&self) -> String {
            "memory".into()
        }

        fn write(&self, entry_name: &str, secret: &str) -> Result<WriteOutcome> {
            if entry_name == "broken" {
                return Err(ApiVaultError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "denied",
                )));
            }
            self.calls
                .borrow_mut()
                .push((entry_name.to_string(), secret.to_string()));
            Ok(WriteOutcome::Updated)
        }
    }

    #[test]
    fn failures_do_not_stop_the_batch() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let propagator = Propagator::new().with(Recording {
            tool: SPIDERFOOT,
            calls: Rc::clone(&calls),
        });

        let entries = vec![
            Entry::new("broken", "x", [SPIDERFOOT]),
            Entry::new("shodan_api", "abc", [SPIDERFOOT, CSI_USERSEARCH]),
            Entry::new("unlisted", "zzz", Vec::<String>::new()),
        ];
        let reports = propagator.propagate(&entries);

        assert_eq!(reports.len(), 2);
        assert!(matches!(
            &reports[0].outcome,
            Err(ApiVaultError::ToolPropagationFailure { tool, .. }) if tool == SPIDERFOOT
        ));
        assert_eq!(reports[1].outcome.as_ref().ok(), Some(&WriteOutcome::Updated));
        assert_eq!(
            *calls.borrow(),
            vec![("shodan_api".to_string(), "abc".to_string())]
        );
    }

    #[test]
    fn canonical_names() {
        assert_eq!(canonical_tool_name("recon-ng"), Some(RECON_NG));
        assert_eq!(canonical_tool_name("SPIDERFOOT"), Some(SPIDERFOOT));
        assert_eq!(canonical_tool_name("the_harvester"), Some(THE_HARVESTER));
        assert_eq!(canonical_tool_name("csi-usersearch"), Some(CSI_USERSEARCH));
        assert_eq!(canonical_tool_name("maltego"), None);
    }

    #[test]
    fn standard_table_covers_every_tool_but_usersearch() {
        let propagator = Propagator::from_paths(&ToolPaths::default());
        let tools: Vec<_> = propagator.writers().map(|w| w.tool()).collect();
        for tool in KNOWN_TOOLS {
            assert_eq!(tools.contains(tool), *tool != CSI_USERSEARCH, "{tool}");
        }
    }
}
