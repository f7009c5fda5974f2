//! Script token substitution.
//!
//! Some tools are shell scripts with the key baked into an assignment such
//! as `atiikey='...'`.  The quoted value of every such assignment is
//! replaced; the rest of the script is left alone.

use std::path::{Path, PathBuf};

use regex::Regex;

use super::text::{rewrite_lines, single_line};
use super::{ToolWriter, WriteOutcome};
use crate::errors::{ApiVaultError, Result};

pub struct ScriptTokenWriter {
    tool: &'static str,
    script_path: PathBuf,
    variable: String,
}

impl ScriptTokenWriter {
    pub fn new(tool: &'static str, script_path: &Path, variable: &str) -> Self {
        Self {
            tool,
            script_path: script_path.to_path_buf(),
            variable: variable.to_string(),
        }
    }
}

/// Quote `value` for a POSIX shell single-quoted string.
fn shell_single_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

impl ToolWriter for ScriptTokenWriter {
    fn tool(&self) -> &'static str {
        self.tool
    }

    fn target(&self) -> String {
        format!("{} ({}='...')", self.script_path.display(), self.variable)
    }

    /// The entry name is not used: the script has a single key slot.
    fn write(&self, _entry_name: &str, secret: &str) -> Result<WriteOutcome> {
        let secret = single_line(self.tool, secret)?;
        let pattern = Regex::new(&format!(
            r#"\b({}=)(?:'(?:[^'\\]|'\\'')*'|"[^"]*"|[^\s;]*)"#,
            regex::escape(&self.variable)
        ))
        .map_err(|e| ApiVaultError::tool_failure(self.tool, format!("bad pattern: {e}")))?;
        let quoted = shell_single_quote(secret);

        let replaced = rewrite_lines(&self.script_path, |line| {
            if line.trim_start().starts_with('#') || !pattern.is_match(line) {
                return None;
            }
            Some(
                pattern
                    .replace_all(line, |caps: &regex::Captures<'_>| {
                        format!("{}{}", &caps[1], quoted)
                    })
                    .into_owned(),
            )
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

    const SCRIPT: &str = "\
#!/bin/bash
# atiikey='do-not-touch'
atiikey=''
curl -H \"key: $atiikey\" https://example.invalid
";

    fn script(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("ProjectHades");
        fs::write(&path, SCRIPT).unwrap();
        path
    }

    #[test]
    fn fills_and_erases_the_token() {
        let dir = TempDir::new().unwrap();
        let path = script(&dir);
        let writer = ScriptTokenWriter::new("Project-Hades", &path, "atiikey");

        assert_eq!(writer.write("hades_api", "k3y").unwrap(), WriteOutcome::Updated);
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\natiikey='k3y'\n"));
        assert!(text.contains("# atiikey='do-not-touch'\n"));
        assert!(text.contains("$atiikey"));

        writer.write("hades_api", "").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), SCRIPT);
    }

    #[test]
    fn single_quotes_are_escaped_and_replaceable() {
        let dir = TempDir::new().unwrap();
        let path = script(&dir);
        let writer = ScriptTokenWriter::new("Project-Hades", &path, "atiikey");

        writer.write("hades_api", "it's").unwrap();
        assert!(fs::read_to_string(&path)
            .unwrap()
            .contains(r"atiikey='it'\''s'"));

        writer.write("hades_api", "plain").unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("\natiikey='plain'\n"));
    }

    #[cfg(unix)]
    #[test]
    fn script_stays_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = script(&dir);
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

        ScriptTokenWriter::new("Project-Hades", &path, "atiikey")
            .write("hades_api", "k3y")
            .unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn missing_script_fails() {
        let dir = TempDir::new().unwrap();
        let writer = ScriptTokenWriter::new("Project-Hades", &dir.path().join("absent"), "atiikey");
        assert!(writer.write("hades_api", "x").is_err());
    }
}
