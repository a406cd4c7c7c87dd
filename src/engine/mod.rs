//! Target resolution, directory expansion and directive execution.
//!
//! The command layer drives these pieces per target:
//!
//! - [`resolve`] finds the directive for a path from its sibling config;
//! - [`walk`] expands directories that have no directive of their own;
//! - [`execute`] performs install, uninstall or status for a match.
pub mod execute;
pub mod resolve;
pub mod walk;

pub use execute::{Operation, Outcome, blocks_install};
pub use resolve::{Resolution, ResolvedAction, Resolver};
pub use walk::Walker;
