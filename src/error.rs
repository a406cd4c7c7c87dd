//! Domain-specific error types for the dotlink engine.
//!
//! Internal modules return typed errors (e.g., [`ConfigError`], [`WalkError`])
//! while command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! - [`ConfigError`]: `dotlink.conf` reading and parsing
//! - [`WalkError`]: directory expansion and directory copies
//! - [`PathError`]: home directory lookup
//!
//! Per-target conditions such as "already installed" are not errors; they
//! are reported through the logger and recorded in the run summary.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise while reading a `dotlink.conf` file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A section header names something other than a known directive.
    #[error("{}:{line}: unknown directive [{name}]", .file.display())]
    UnknownDirective {
        /// Config file containing the header.
        file: PathBuf,
        /// 1-based line number.
        line: usize,
        /// The header as written.
        name: String,
    },

    /// A line could not be parsed.
    #[error("{}:{line}: {message}", .file.display())]
    InvalidSyntax {
        /// Config file containing the line.
        file: PathBuf,
        /// 1-based line number.
        line: usize,
        /// Human-readable description of the problem.
        message: String,
    },

    /// An I/O error occurred while reading a config file.
    #[error("IO error reading config file {}: {source}", .path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise while expanding a directory target.
#[derive(Error, Debug)]
pub enum WalkError {
    /// The directory was already entered during this invocation, which
    /// means a symlink loops back into the tree.
    #[error(
        "directory cycle detected at {} (resolves to {})",
        .path.display(),
        .canonical.display()
    )]
    Cycle {
        /// Path as reached by the walk.
        path: PathBuf,
        /// Canonical path that was already visited.
        canonical: PathBuf,
    },

    /// The directory could not be listed.
    #[error("cannot read directory {}: {source}", .path.display())]
    ReadDir {
        /// Directory that failed to list.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise while resolving paths.
#[derive(Error, Debug)]
pub enum PathError {
    /// Neither `HOME` nor (on Windows) `USERPROFILE` is set.
    #[error("cannot determine home directory: {0} is not set")]
    HomeNotSet(&'static str),
}
