//! One module per subcommand, each exposing `execute`.

pub mod add;
pub mod completions;
pub mod get;
pub mod init;
pub mod list;
pub mod remove;
pub mod rotate;
pub mod set;
pub mod supported_tools;
pub mod sync;
pub mod tools;
pub mod wipe;
