//! Copy resource.
use anyhow::{Context as _, Result};
use std::path::PathBuf;
use std::sync::Arc;

use super::{Resource, ResourceState};
use crate::operations::{EntryKind, FileSystemOps};

/// An independent copy of `source` at `target`.
///
/// Contents are never compared; any file or directory at the target counts
/// as installed.
#[derive(Debug, Clone)]
pub struct CopyResource {
    /// File or directory to copy.
    pub source: PathBuf,
    /// Where the copy is placed.
    pub target: PathBuf,
    fs_ops: Arc<dyn FileSystemOps>,
}

impl CopyResource {
    /// Create a new copy resource.
    #[must_use]
    pub fn new(source: PathBuf, target: PathBuf, fs_ops: Arc<dyn FileSystemOps>) -> Self {
        Self {
            source,
            target,
            fs_ops,
        }
    }
}

impl Resource for CopyResource {
    fn description(&self) -> String {
        format!("{} <- {}", self.target.display(), self.source.display())
    }

    /// A copy that fails part way is removed again, so the target never
    /// holds a partial tree.
    fn apply(&self) -> Result<()> {
        super::helpers::fs::ensure_parent_dir(&*self.fs_ops, &self.target)?;
        let Err(err) = super::helpers::fs::copy_recursive(&*self.fs_ops, &self.source, &self.target)
        else {
            return Ok(());
        };
        match self.fs_ops.remove_all(&self.target) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(err.context(format!(
                "partial copy left at {}: {e}",
                self.target.display()
            ))),
            _ => Err(err),
        }
    }

    fn remove(&self) -> Result<()> {
        self.fs_ops
            .remove_all(&self.target)
            .with_context(|| format!("remove copy: {}", self.target.display()))
    }

    fn current_state(&self) -> Result<ResourceState> {
        let state = match self.fs_ops.entry_kind(&self.target) {
            EntryKind::Missing => ResourceState::Missing,
            EntryKind::File | EntryKind::Dir => ResourceState::Correct,
            EntryKind::Symlink => ResourceState::Incorrect {
                current: "symlink, not a copy".to_string(),
            },
        };
        Ok(state)
    }
}
