//! In-memory CRUD over a decrypted `Vault`.
//!
//! `VaultStore` never touches disk.  Every change stays in memory until
//! the session hands the vault back to `VaultCodec::encrypt`.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::entry::{Entry, Vault};
use crate::errors::{ApiVaultError, Result};

/// How a caller points at an entry to remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntrySelector {
    /// 1-based position as shown in the `list` table.
    Position(usize),
    /// Entry name.
    Name(String),
}

impl FromStr for EntrySelector {
    type Err = std::convert::Infallible;

    /// `#3` selects by position; anything else, `2024` included, is a name.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let position = s
            .strip_prefix('#')
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse::<usize>().ok());
        Ok(match position {
            Some(n) => Self::Position(n),
            None => Self::Name(s.to_string()),
        })
    }
}

impl fmt::Display for EntrySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(n) => write!(f, "#{n}"),
            Self::Name(name) => write!(f, "'{name}'"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct VaultStore {
    vault: Vault,
}

impl VaultStore {
    /// An empty store (first run).
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a vault that was just decrypted.
    pub fn from_vault(vault: Vault) -> Self {
        Self { vault }
    }

    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    pub fn into_vault(self) -> Vault {
        self.vault
    }

    pub fn len(&self) -> usize {
        self.vault.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vault.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.vault.get(name)
    }

    /// All entries in display order.
    pub fn snapshot(&self) -> Vec<Entry> {
        self.vault.entries().to_vec()
    }

    /// Append a new entry.
    pub fn add_entry<I, S>(&mut self, name: &str, secret: &str, tools: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        validate_entry_name(name)?;
        validate_secret(name, secret)?;
        if self.vault.position(name).is_some() {
            return Err(ApiVaultError::DuplicateName(name.to_string()));
        }
        self.vault
            .entries_mut()
            .push(Entry::new(name, secret, tools));
        Ok(())
    }

    /// Replace the secret of an existing entry.  Tools are untouched.
    pub fn upsert_secret(&mut self, name: &str, secret: &str) -> Result<()> {
        let entry = self.entry_mut(name)?;
        validate_secret(name, secret)?;
        entry.secret.clear();
        entry.secret.push_str(secret);
        Ok(())
    }

    /// Replace the tool list of an existing entry.
    pub fn set_tools<I, S>(&mut self, name: &str, tools: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = self.entry_mut(name)?;
        entry.tools = tools.into_iter().map(Into::into).collect::<BTreeSet<_>>();
        Ok(())
    }

    /// Remove one entry and return it.
    pub fn remove_entry(&mut self, selector: &EntrySelector) -> Result<Entry> {
        let index = match selector {
            // Display positions start at 1; 0 is never valid.
            EntrySelector::Position(n) => n
                .checked_sub(1)
                .filter(|i| *i < self.vault.len()),
            EntrySelector::Name(name) => self.vault.position(name),
        };

        match index {
            Some(i) => Ok(self.vault.entries_mut().remove(i)),
            None => Err(ApiVaultError::NotFound(selector.to_string())),
        }
    }

    /// Blank every secret; names and tool lists stay.
    pub fn wipe_secrets(&mut self) {
        for entry in self.vault.entries_mut() {
            entry.secret.clear();
        }
    }

    fn entry_mut(&mut self, name: &str) -> Result<&mut Entry> {
        self.vault
            .entries_mut()
            .iter_mut()
            .find(|e| e.name == name)
            .ok_or_else(|| ApiVaultError::NotFound(format!("'{name}'")))
    }
}

/// Entry names: non-empty, at most 256 characters, no control characters
/// and no surrounding whitespace.
fn validate_entry_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ApiVaultError::InvalidName("name cannot be empty".into()));
    }
    if name.chars().count() > 256 {
        return Err(ApiVaultError::InvalidName(
            "name cannot exceed 256 characters".into(),
        ));
    }
    if name.trim() != name {
        return Err(ApiVaultError::InvalidName(format!(
            "'{name}' has leading or trailing whitespace"
        )));
    }
    if name.chars().any(char::is_control) {
        return Err(ApiVaultError::InvalidName(format!(
            "'{}' contains control characters",
            name.escape_default()
        )));
    }
    Ok(())
}

/// Secrets are written into line-based tool configs, so they must fit on
/// one line.
fn validate_secret(name: &str, secret: &str) -> Result<()> {
    if secret.chars().any(char::is_control) {
        return Err(ApiVaultError::InvalidSecret(name.to_string()));
    }
    Ok(())
}
