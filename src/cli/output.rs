//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::propagate::{ToolReport, WriteOutcome};
use crate::vault::Entry;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Hide all but the last four characters of a secret.
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count == 0 {
        return String::new();
    }
    if count <= 4 {
        return "****".to_string();
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("****{tail}")
}

/// Print the entries table (#, Name, API Key, Tools).
pub fn print_entries_table(entries: &[Entry], show_secrets: bool) {
    if entries.is_empty() {
        info("No API keys in this vault yet.");
        tip("Run `apivault add <NAME> --tool <TOOL>` to add your first entry.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Name", "API Key", "Tools"]);

    for (i, entry) in entries.iter().enumerate() {
        let key = if show_secrets {
            entry.secret.clone()
        } else {
            mask_secret(&entry.secret)
        };
        let tools = entry.tools.iter().cloned().collect::<Vec<_>>().join(", ");
        table.add_row(vec![(i + 1).to_string(), entry.name.clone(), key, tools]);
    }

    println!("{table}");
}

/// Print one line per tool write plus a summary line.
pub fn print_tool_reports(reports: &[ToolReport]) {
    if reports.is_empty() {
        return;
    }

    let mut failed = 0;
    for report in reports {
        match &report.outcome {
            Ok(WriteOutcome::Updated) => {
                success(&format!("{}: updated {}", report.tool, report.entry));
            }
            Ok(WriteOutcome::NoMatch) => {
                tip(&format!("{}: no slot for {}", report.tool, report.entry));
            }
            Err(e) => {
                failed += 1;
                warning(&e.to_string());
            }
        }
    }

    if failed == 0 {
        info(&format!("Pushed keys to {} tool slot(s).", reports.len()));
    } else {
        warning(&format!(
            "{failed} of {} tool write(s) failed; the vault itself is saved.",
            reports.len()
        ));
    }
}
