//! SpiderFoot exports its module options as `sfp_<module>:<option> = <value>`
//! lines in `SpiderFoot.cfg`.
//!
//! An entry name such as `shodan_api` maps to module `shodan` and to any
//! option of that module whose name contains `api`, i.e.
//! `sfp_shodan:api_key`.  A single-word entry name matches the module's
//! `api_key`/`apikey` option.

use std::path::{Path, PathBuf};

use regex::Regex;

use super::osint_search::assign;
use super::text::{rewrite_lines, single_line};
use super::{ToolWriter, WriteOutcome, SPIDERFOOT};
use crate::errors::{ApiVaultError, Result};

pub struct SpiderfootWriter {
    cfg_path: PathBuf,
}

impl SpiderfootWriter {
    pub fn new(cfg_path: &Path) -> Self {
        Self {
            cfg_path: cfg_path.to_path_buf(),
        }
    }
}

/// Build the line pattern for `entry_name`.  Group 1 is everything up to
/// and including the `=`, group 2 the blanks after it, group 3 the value.
fn option_pattern(entry_name: &str) -> Result<Regex> {
    let mut parts = entry_name
        .split('_')
        .filter(|p| !p.is_empty())
        .map(regex::escape);

    let module = parts
        .next()
        .ok_or_else(|| ApiVaultError::tool_failure(SPIDERFOOT, "empty entry name"))?;
    let rest: Vec<String> = parts.collect();
    let option = if rest.is_empty() {
        "api_?key".to_string()
    } else {
        rest.join("[^=]*")
    };

    Regex::new(&format!(
        r"(?i)^(\s*sfp_{module}:[^=]*{option}[^=]*=)([ \t]*)(.*)$"
    ))
    .map_err(|e| ApiVaultError::tool_failure(SPIDERFOOT, format!("bad pattern: {e}")))
}

impl ToolWriter for SpiderfootWriter {
    fn tool(&self) -> &'static str {
        SPIDERFOOT
    }

    fn target(&self) -> String {
        self.cfg_path.display().to_string()
    }

    fn write(&self, entry_name: &str, secret: &str) -> Result<WriteOutcome> {
        let secret = single_line(SPIDERFOOT, secret)?;
        let pattern = option_pattern(entry_name)?;

        let replaced = rewrite_lines(&self.cfg_path, |line| {
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CFG: &str = "\
# SpiderFoot config
sfp_shodan:api_key = old
sfp_shodan:maxpages = 10
sfp_shodanx:api_key = other
sfp_hunter:api_key =
sfp_censys:api_key_uid = u
sfp_censys:api_key_secret = s
";

    fn cfg(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("SpiderFoot.cfg");
        fs::write(&path, CFG).unwrap();
        path
    }

    #[test]
    fn rewrites_only_the_matching_option() {
        let dir = TempDir::new().unwrap();
        let path = cfg(&dir);
        let writer = SpiderfootWriter::new(&path);

        assert_eq!(writer.write("shodan_api", "xyz999").unwrap(), WriteOutcome::Updated);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("sfp_shodan:api_key = xyz999\n"));
        assert!(text.contains("sfp_shodan:maxpages = 10\n"));
        assert!(text.contains("sfp_shodanx:api_key = other\n"));
    }

    #[test]
    fn fills_an_empty_value() {
        let dir = TempDir::new().unwrap();
        let path = cfg(&dir);
        SpiderfootWriter::new(&path).write("hunter", "h-1").unwrap();
        assert!(fs::read_to_string(&path)
            .unwrap()
            .contains("sfp_hunter:api_key = h-1\n"));
    }

    #[test]
    fn multi_part_names_select_a_specific_option() {
        let dir = TempDir::new().unwrap();
        let path = cfg(&dir);
        SpiderfootWriter::new(&path)
            .write("censys_api_secret", "S2")
            .unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("sfp_censys:api_key_secret = S2\n"));
        assert!(text.contains("sfp_censys:api_key_uid = u\n"));
    }

    #[test]
    fn erasure_blanks_the_value() {
        let dir = TempDir::new().unwrap();
        let path = cfg(&dir);
        SpiderfootWriter::new(&path).write("shodan_api", "").unwrap();
        assert!(fs::read_to_string(&path)
            .unwrap()
            .contains("sfp_shodan:api_key = \n"));
    }

    #[test]
    fn dollar_signs_are_literal() {
        let dir = TempDir::new().unwrap();
        let path = cfg(&dir);
        SpiderfootWriter::new(&path).write("shodan_api", "a$1b").unwrap();
        assert!(fs::read_to_string(&path)
            .unwrap()
            .contains("sfp_shodan:api_key = a$1b\n"));
    }

    #[test]
    fn multi_line_key_leaves_config_untouched() {
        let dir = TempDir::new().unwrap();
        let path = cfg(&dir);
        let err = SpiderfootWriter::new(&path)
            .write("shodan_api", "abc\nsfp_hunter:api_key = evil")
            .unwrap_err();
        assert!(matches!(err, ApiVaultError::ToolPropagationFailure { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), CFG);
    }

    #[test]
    fn unknown_module_is_no_match() {
        let dir = TempDir::new().unwrap();
        let path = cfg(&dir);
        assert_eq!(
            SpiderfootWriter::new(&path).write("github_api", "g").unwrap(),
            WriteOutcome::NoMatch
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), CFG);
    }
}
