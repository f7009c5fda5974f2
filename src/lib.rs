pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod propagate;
pub mod session;
pub mod vault;

pub use errors::{ApiVaultError, Result};
pub use session::{VaultSession, VaultState};
