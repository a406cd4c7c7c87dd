//! Per-directory declarative dotfile installer.
//!
//! Each directory of a dotfiles tree may hold a `dotlink.conf` file whose
//! sections (`[slink]`, `[hlink]`, `[copy]`, `[ignore]`) say how the
//! directory's entries are placed at their destinations.  The tool installs,
//! uninstalls or reports on those placements.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: parse and validate `dotlink.conf` files
//! - **[`resources`]**: per-directive create, inspect and remove primitives
//! - **[`engine`]**: resolve a target's directive, expand directories, execute
//! - **[`commands`]**: subcommand orchestration (`install`, `uninstall`, `status`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod logging;
pub mod operations;
pub mod paths;
pub mod resources;

/// Version string: `DOTLINK_VERSION` at build time, else the crate version.
pub const VERSION: &str = match option_env!("DOTLINK_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};
