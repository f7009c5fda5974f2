//! Line-oriented rewriting shared by the text-config writers.

use std::fs;
use std::path::Path;

use crate::errors::{ApiVaultError, Result};
use crate::vault::format::atomic_write;

/// Rewrite a text file line by line.
///
/// `rewrite` sees each line without its terminator and returns `Some` to
/// replace it.  Terminators (`\n` or `\r\n`) and untouched lines are kept
/// byte for byte.  The file is only rewritten if something changed, and
/// then atomically.  Returns the number of lines `rewrite` replaced.
pub(crate) fn rewrite_lines<F>(path: &Path, mut rewrite: F) -> Result<usize>
where
    F: FnMut(&str) -> Option<String>,
{
    let original = fs::read_to_string(path)?;
    let mut output = String::with_capacity(original.len() + 64);
    let mut replaced = 0;

    for raw in original.split_inclusive('\n') {
        let (line, ending) = split_ending(raw);
        match rewrite(line) {
            Some(new_line) => {
                replaced += 1;
                output.push_str(&new_line);
            }
            None => output.push_str(line),
        }
        output.push_str(ending);
    }

    if replaced > 0 && output != original {
        atomic_write(path, output.as_bytes())?;
    }
    Ok(replaced)
}

/// Refuse a value that would not stay on the line it is written to.
pub(crate) fn single_line<'a>(tool: &str, value: &'a str) -> Result<&'a str> {
    if value.chars().any(char::is_control) {
        return Err(ApiVaultError::tool_failure(
            tool,
            "API key contains line breaks or control characters; not written",
        ));
    }
    Ok(value)
}

fn split_ending(raw: &str) -> (&str, &str) {
    if let Some(line) = raw.strip_suffix("\r\n") {
        (line, "\r\n")
    } else if let Some(line) = raw.strip_suffix('\n') {
        (line, "\n")
    } else {
        (raw, "")
    }
}
