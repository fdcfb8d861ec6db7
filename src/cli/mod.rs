//! Interactive shell and script runner over the ledger services.

pub mod commands;
pub mod core;
pub mod io;
pub mod output;
mod shell;

pub use self::core::{CliError, CliMode};
pub use shell::{run_cli, SCRIPT_MODE_ENV};
