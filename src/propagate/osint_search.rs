//! OSINT-Search reads its keys from `osintSearch.config.ini`, one
//! `name = value` option per key, grouped in sections.  Options are
//! matched on the entry name, case-insensitively, in any section.

use std::path::{Path, PathBuf};

use regex::Regex;

use super::text::{rewrite_lines, single_line};
use super::{ToolWriter, WriteOutcome, OSINT_SEARCH};
use crate::errors::{ApiVaultError, Result};

pub struct OsintSearchWriter {
    ini_path: PathBuf,
}

impl OsintSearchWriter {
    pub fn new(ini_path: &Path) -> Self {
        Self {
            ini_path: ini_path.to_path_buf(),
        }
    }
}

/// Rebuild `key=value` with a new value.  A bare `key =` gains one space
/// before the value; existing spacing is otherwise kept.
pub(crate) fn assign(lhs: &str, gap: &str, old_value: &str, value: &str) -> String {
    let spaced = lhs
        .trim_end_matches(['=', ':'])
        .ends_with([' ', '\t']);
    if gap.is_empty() && old_value.is_empty() && !value.is_empty() && spaced {
        format!("{lhs} {value}")
    } else {
        format!("{lhs}{gap}{value}")
    }
}

impl ToolWriter for OsintSearchWriter {
    fn tool(&self) -> &'static str {
        OSINT_SEARCH
    }

    fn target(&self) -> String {
        self.ini_path.display().to_string()
    }

    fn write(&self, entry_name: &str, secret: &str) -> Result<WriteOutcome> {
        let secret = single_line(OSINT_SEARCH, secret)?;
        let pattern = Regex::new(&format!(
            r"(?i)^(\s*{}\s*[=:])([ \t]*)(.*)$",
            regex::escape(entry_name)
        ))
        .map_err(|e| ApiVaultError::tool_failure(OSINT_SEARCH, format!("bad pattern: {e}")))?;

        let replaced = rewrite_lines(&self.ini_path, |line| {
            let trimmed = line.trim_start();
            if trimmed.starts_with(['#', ';', '[']) {
                return None;
            }
            pattern
                .captures(line)
                .map(|caps| assign(&caps[1], &caps[2], &caps[3], secret))
        })?;

        Ok(if replaced > 0 {
            WriteOutcome::Updated
        } else {
            WriteOutcome::NoMatch
        })
    }
}
