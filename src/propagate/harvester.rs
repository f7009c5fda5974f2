//! theHarvester reads `api-keys.yaml`:
//!
//! ```yaml
//! apikeys:
//!   shodan:
//!     key: <value>
//! ```
//!
//! The service block is the entry name without a trailing `_api`.  Only the
//! `key:` line inside that block is touched; comments and layout survive.

use std::path::{Path, PathBuf};

use super::text::{rewrite_lines, single_line};
use super::{ToolWriter, WriteOutcome, THE_HARVESTER};
use crate::errors::Result;

pub struct HarvesterWriter {
    yaml_path: PathBuf,
}

impl HarvesterWriter {
    pub fn new(yaml_path: &Path) -> Self {
        Self {
            yaml_path: yaml_path.to_path_buf(),
        }
    }
}

/// `shodan_api` -> `shodan`.
fn service_name(entry_name: &str) -> String {
    let lower = entry_name.to_ascii_lowercase();
    lower
        .strip_suffix("_api")
        .map(str::to_string)
        .unwrap_or(lower)
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Render a YAML scalar, single-quoting anything that is not plain.
fn yaml_scalar(value: &str) -> String {
    let plain = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | '+'))
        && !value.starts_with(['-', '.']);
    if plain {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', "''"))
    }
}

impl ToolWriter for HarvesterWriter {
    fn tool(&self) -> &'static str {
        THE_HARVESTER
    }

    fn target(&self) -> String {
        self.yaml_path.display().to_string()
    }

    fn write(&self, entry_name: &str, secret: &str) -> Result<WriteOutcome> {
        let secret = single_line(THE_HARVESTER, secret)?;
        let service = service_name(entry_name);
        let header = format!("{service}:");
        // Indent of the service header while inside its block.
        let mut block_indent: Option<usize> = None;

        let replaced = rewrite_lines(&self.yaml_path, |line| {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                return None;
            }
            let indent = indent_of(line);

            if let Some(outer) = block_indent {
                if indent <= outer {
                    block_indent = None;
                } else {
                    let value = trimmed.strip_prefix("key:")?;
                    if !value.is_empty() && !value.starts_with([' ', '\t']) {
                        return None;
                    }
                    let pad = &line[..indent];
                    return Some(if secret.is_empty() {
                        format!("{pad}key:")
                    } else {
                        format!("{pad}key: {}", yaml_scalar(secret))
                    });
                }
            }

            if indent > 0 && trimmed.eq_ignore_ascii_case(&header) {
                block_indent = Some(indent);
            }
            None
        })?;

        Ok(if replaced > 0 {
            WriteOutcome::Updated
        } else {
            WriteOutcome::NoMatch
        })
    }
}
