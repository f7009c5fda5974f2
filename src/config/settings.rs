use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::KdfParams;
use crate::errors::{ApiVaultError, Result};

/// User configuration, loaded from `config.toml`.
///
/// Every field has a sensible default so apivault works out-of-the-box
/// without any config file at all.  Defaults follow the CSI Linux layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Where the encrypted vault lives.
    #[serde(default = "default_vault_path")]
    pub vault_path: PathBuf,

    /// Argon2 memory cost in KiB (default: 64 MB).
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count (default: 3).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2 parallelism degree (default: 4).
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,

    /// Config files of the tools that receive keys.
    #[serde(default)]
    pub tools: ToolPaths,
}

/// Locations of each external tool's key storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolPaths {
    #[serde(default = "default_recon_ng_db")]
    pub recon_ng_db: PathBuf,

    #[serde(default = "default_spiderfoot_cfg")]
    pub spiderfoot_cfg: PathBuf,

    #[serde(default = "default_harvester_yaml")]
    pub harvester_yaml: PathBuf,

    #[serde(default = "default_osint_search_ini")]
    pub osint_search_ini: PathBuf,

    #[serde(default = "default_hades_script")]
    pub hades_script: PathBuf,
}

// ── Serde default helpers ────────────────────────────────────────────

fn app_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("apivault")
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn default_vault_path() -> PathBuf {
    app_config_dir().join("apikeys.vault")
}

fn default_argon2_memory_kib() -> u32 {
    65_536 // 64 MB
}

fn default_argon2_iterations() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    4
}

fn default_recon_ng_db() -> PathBuf {
    home_dir().join(".recon-ng").join("keys.db")
}

fn default_spiderfoot_cfg() -> PathBuf {
    PathBuf::from("/opt/csitools/SpiderFoot.cfg")
}

fn default_harvester_yaml() -> PathBuf {
    PathBuf::from("/opt/theHarvester/api-keys.yaml")
}

fn default_osint_search_ini() -> PathBuf {
    PathBuf::from("/opt/OSINT-Search/osintSearch.config.ini")
}

fn default_hades_script() -> PathBuf {
    PathBuf::from("/opt/csitools/ProjectHades")
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_path: default_vault_path(),
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
            tools: ToolPaths::default(),
        }
    }
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            recon_ng_db: default_recon_ng_db(),
            spiderfoot_cfg: default_spiderfoot_cfg(),
            harvester_yaml: default_harvester_yaml(),
            osint_search_ini: default_osint_search_ini(),
            hades_script: default_hades_script(),
        }
    }
}

impl Settings {
    /// Name of the config file inside the config directory.
    const FILE_NAME: &'static str = "config.toml";

    /// The default config file: `<config_dir>/apivault/config.toml`.
    pub fn default_path() -> PathBuf {
        app_config_dir().join(Self::FILE_NAME)
    }

    /// Load settings from `path`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            ApiVaultError::ConfigError(format!("Failed to parse {}: {e}", path.display()))
        })?;

        Ok(settings)
    }

    /// Convert the Argon2 settings into crypto-layer params.
    pub fn kdf_params(&self) -> KdfParams {
        KdfParams {
            memory_kib: self.argon2_memory_kib,
            iterations: self.argon2_iterations,
            parallelism: self.argon2_parallelism,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
