//! CLI module: Clap argument parser, prompts, output helpers, and command
//! implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{ApiVaultError, Result};
use crate::propagate::{canonical_tool_name, KNOWN_TOOLS};
use crate::session::VaultSession;
use crate::vault::VaultCodec;

/// Environment variable consulted before prompting for the vault password.
pub const PASSWORD_ENV: &str = "APIVAULT_PASSWORD";

/// Environment variable consulted before prompting for a replacement
/// password in `rotate-key`.
pub const NEW_PASSWORD_ENV: &str = "APIVAULT_NEW_PASSWORD";

/// Interactive unlock attempts before giving up.
const UNLOCK_ATTEMPTS: u32 = 3;

/// apivault CLI: encrypted API-key vault for OSINT tools.
#[derive(Parser)]
#[command(
    name = "apivault",
    about = "Encrypted API key vault for OSINT tools",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault file (overrides `vault_path` from the config file)
    #[arg(long, global = true, env = "APIVAULT_VAULT")]
    pub vault: Option<PathBuf>,

    /// Config file (default: <config dir>/apivault/config.toml)
    #[arg(long, global = true, env = "APIVAULT_CONFIG")]
    pub config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new vault (first run)
    Init,

    /// List all API entries
    List {
        /// Show API keys in clear text
        #[arg(long)]
        show: bool,
    },

    /// Print one API key
    Get {
        /// Entry name (e.g. shodan_api)
        name: String,
    },

    /// Add a new API entry
    Add {
        /// Entry name (e.g. shodan_api)
        name: String,
        /// Tool that should receive this key (repeatable)
        #[arg(short, long = "tool")]
        tools: Vec<String>,
        /// Initial API key (default: empty)
        #[arg(long)]
        value: Option<String>,
        /// Do not push keys to tool configs
        #[arg(long)]
        no_sync: bool,
    },

    /// Set the API key of an existing entry
    Set {
        /// Entry name
        name: String,
        /// API key (omit for stdin or an interactive prompt)
        value: Option<String>,
        /// Do not push keys to tool configs
        #[arg(long)]
        no_sync: bool,
    },

    /// Replace the tools an entry is pushed to
    Tools {
        /// Entry name
        name: String,
        /// Tool that should receive this key (repeatable; none clears)
        #[arg(short, long = "tool")]
        tools: Vec<String>,
        /// Do not push keys to tool configs
        #[arg(long)]
        no_sync: bool,
    },

    /// Remove an entry by name or by list position (#N)
    Remove {
        /// Entry name, or its position in `list` (e.g. #2)
        entry: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Blank every API key in the vault and in every tool config
    Wipe {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Push all API keys to tool configs again
    Sync,

    /// Change the vault password
    RotateKey,

    /// List the tools keys can be pushed to
    SupportedTools,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load settings from `--config` (or the default location) and apply
/// `--vault`.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let config_path = cli.config.clone().unwrap_or_else(Settings::default_path);
    let mut settings = Settings::load(&config_path)?;
    if let Some(vault) = &cli.vault {
        settings.vault_path = vault.clone();
    }
    Ok(settings)
}

/// Get the vault password, trying in order:
/// 1. `APIVAULT_PASSWORD` env var (scripted use)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = env_password(PASSWORD_ENV) {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter password to decrypt the API keys file")
        .allow_empty_password(true)
        .interact()
        .map_err(|e| ApiVaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new password and its confirmation.
///
/// Both are returned as typed; the session checks that they match.  With
/// `env_var` set, its value is used for both.
pub fn prompt_new_password(env_var: &str) -> Result<(Zeroizing<String>, Zeroizing<String>)> {
    if let Some(pw) = env_password(env_var) {
        return Ok((pw.clone(), pw));
    }

    let ask = |prompt: &str| {
        dialoguer::Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .map(Zeroizing::new)
            .map_err(|e| ApiVaultError::CommandFailed(format!("password prompt: {e}")))
    };

    let password = ask("Enter a new password")?;
    let confirmation = ask("Re-enter the password")?;
    Ok((password, confirmation))
}

/// A non-empty password from `var`, if set.
fn env_password(var: &str) -> Option<Zeroizing<String>> {
    std::env::var(var)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}

/// Ask a yes/no question; `false` unless the user says yes.
pub fn confirm(prompt: &str) -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| ApiVaultError::CommandFailed(format!("confirm prompt: {e}")))
}

/// Prompt for the password and unlock the configured vault.
pub fn open_session(settings: &Settings) -> Result<VaultSession> {
    let codec = VaultCodec::new(&settings.vault_path);
    if !codec.exists() {
        return Err(ApiVaultError::VaultNotFound(codec.path().to_path_buf()));
    }
    // A password from the environment gets one try; a typed one gets a few.
    let attempts = if env_password(PASSWORD_ENV).is_some() {
        1
    } else {
        UNLOCK_ATTEMPTS
    };

    let mut attempt = 1;
    loop {
        let password = prompt_password()?;
        match VaultSession::unlock(codec.clone(), &password) {
            Err(ApiVaultError::InvalidKey) if attempt < attempts => {
                output::warning("Wrong password or unreadable vault file, try again.");
                attempt += 1;
            }
            result => return result,
        }
    }
}

/// Resolve tool names typed by the user to their canonical spelling.
pub fn resolve_tools(names: &[String]) -> Result<Vec<&'static str>> {
    names
        .iter()
        .map(|name| {
            canonical_tool_name(name).ok_or_else(|| {
                ApiVaultError::CommandFailed(format!(
                    "unknown tool '{name}' — supported: {}",
                    KNOWN_TOOLS.join(", ")
                ))
            })
        })
        .collect()
}
