//! Options and services shared by every component during one invocation.
use std::path::PathBuf;
use std::sync::Arc;

use crate::logging::Log;
use crate::operations::{FileSystemOps, SystemFileSystemOps};

/// Immutable run context, built once at startup and passed by reference.
pub struct Context {
    /// Canonical working root; relative targets are resolved against it.
    pub root: PathBuf,
    /// Home directory used to expand `~` in destinations.
    pub home: PathBuf,
    /// Report actions instead of performing them.
    pub dry_run: bool,
    /// Show informational notes; always `true` under dry-run.
    pub verbose: bool,
    /// Logger for output and target recording.
    pub log: Arc<dyn Log>,
    /// Filesystem operation abstraction (injectable for testing).
    pub fs_ops: Arc<dyn FileSystemOps>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("root", &self.root)
            .field("home", &self.home)
            .field("dry_run", &self.dry_run)
            .field("verbose", &self.verbose)
            .field("log", &"<dyn Log>")
            .field("fs_ops", &self.fs_ops)
            .finish()
    }
}

impl Context {
    /// Creates a context over the real filesystem.
    ///
    /// `verbose` is forced on under `dry_run`.
    #[must_use]
    pub fn new(
        root: PathBuf,
        home: PathBuf,
        log: Arc<dyn Log>,
        dry_run: bool,
        verbose: bool,
    ) -> Self {
        Self {
            root,
            home,
            dry_run,
            verbose: verbose || dry_run,
            log,
            fs_ops: Arc::new(SystemFileSystemOps),
        }
    }
}
