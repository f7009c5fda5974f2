//! Recon-ng keeps API keys in a SQLite table `keys (name, Value)`.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OpenFlags};

use super::{ToolWriter, WriteOutcome, RECON_NG};
use crate::errors::{ApiVaultError, Result};

pub struct ReconNgWriter {
    db_path: PathBuf,
}

impl ReconNgWriter {
    pub fn new(db_path: &Path) -> Self {
        Self {
            db_path: db_path.to_path_buf(),
        }
    }
}

impl ToolWriter for ReconNgWriter {
    fn tool(&self) -> &'static str {
        RECON_NG
    }

    fn target(&self) -> String {
        format!("{} (keys table)", self.db_path.display())
    }

    fn write(&self, entry_name: &str, secret: &str) -> Result<WriteOutcome> {
        // Never create the database: recon-ng owns its schema.
        let conn = Connection::open_with_flags(&self.db_path, OpenFlags::SQLITE_OPEN_READ_WRITE)
            .map_err(|e| {
                ApiVaultError::tool_failure(
                    RECON_NG,
                    format!("cannot open {}: {e}", self.db_path.display()),
                )
            })?;

        let changed = conn
            .execute(
                "UPDATE keys SET Value = ?1 WHERE name = ?2",
                params![secret, entry_name],
            )
            .map_err(|e| ApiVaultError::tool_failure(RECON_NG, format!("update failed: {e}")))?;

        Ok(if changed > 0 {
            WriteOutcome::Updated
        } else {
            WriteOutcome::NoMatch
        })
    }
}
