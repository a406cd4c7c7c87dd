//! Hard link resource.
use anyhow::{Context as _, Result};
use std::path::PathBuf;
use std::sync::Arc;

use super::{Resource, ResourceState};
use crate::operations::{EntryKind, FileSystemOps};

/// A hard link at `target` sharing its inode with `source`.
#[derive(Debug, Clone)]
pub struct HardlinkResource {
    /// The existing file.
    pub source: PathBuf,
    /// Where the second name is created.
    pub target: PathBuf,
    fs_ops: Arc<dyn FileSystemOps>,
}

impl HardlinkResource {
    /// Create a new hard link resource.
    #[must_use]
    pub fn new(source: PathBuf, target: PathBuf, fs_ops: Arc<dyn FileSystemOps>) -> Self {
        Self {
            source,
            target,
            fs_ops,
        }
    }
}

impl Resource for HardlinkResource {
    fn description(&self) -> String {
        format!("{} => {}", self.target.display(), self.source.display())
    }

    fn apply(&self) -> Result<()> {
        super::helpers::fs::ensure_parent_dir(&*self.fs_ops, &self.target)?;
        self.fs_ops
            .hard_link(&self.source, &self.target)
            .with_context(|| {
                format!(
                    "create hard link: {} => {}",
                    self.target.display(),
                    self.source.display()
                )
            })
    }

    fn remove(&self) -> Result<()> {
        self.fs_ops
            .remove_all(&self.target)
            .with_context(|| format!("remove hard link: {}", self.target.display()))
    }

    fn current_state(&self) -> Result<ResourceState> {
        let state = match self.fs_ops.entry_kind(&self.target) {
            EntryKind::Missing => ResourceState::Missing,
            EntryKind::Symlink => ResourceState::Incorrect {
                current: "symlink, not a hard link".to_string(),
            },
            EntryKind::File | EntryKind::Dir
                if self.fs_ops.same_file(&self.target, &self.source) =>
            {
                ResourceState::Correct
            }
            EntryKind::File | EntryKind::Dir => ResourceState::Incorrect {
                current: "a different file than the source".to_string(),
            },
        };
        Ok(state)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::operations::{MockFileSystemOps, SystemFileSystemOps};

    #[test]
    fn correct_only_for_same_inode() {
        let fs = Arc::new(
            MockFileSystemOps::new()
                .with_file("/repo/ssh/config")
                .with_dir("/home/.ssh"),
        );
        let r = HardlinkResource::new(
            PathBuf::from("/repo/ssh/config"),
            PathBuf::from("/home/.ssh/config"),
            fs,
        );
        assert_eq!(r.current_state().unwrap(), ResourceState::Missing);
        r.apply().unwrap();
        assert_eq!(r.current_state().unwrap(), ResourceState::Correct);
        r.remove().unwrap();
        assert_eq!(r.current_state().unwrap(), ResourceState::Missing);
    }

    #[test]
    fn copy_at_target_is_incorrect() {
        let r = HardlinkResource::new(
            PathBuf::from("/repo/a"),
            PathBuf::from("/home/a"),
            Arc::new(
                MockFileSystemOps::new()
                    .with_file("/repo/a")
                    .with_file("/home/a"),
            ),
        );
        assert_eq!(
            r.current_state().unwrap(),
            ResourceState::Incorrect {
                current: "a different file than the source".to_string()
            }
        );
    }

    #[test]
    fn symlink_at_target_is_incorrect() {
        let r = HardlinkResource::new(
            PathBuf::from("/repo/a"),
            PathBuf::from("/home/a"),
            Arc::new(
                MockFileSystemOps::new()
                    .with_file("/repo/a")
                    .with_symlink("/home/a", "/repo/a"),
            ),
        );
        assert!(matches!(
            r.current_state().unwrap(),
            ResourceState::Incorrect { .. }
        ));
    }

    #[test]
    fn real_hard_link_shares_content() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        std::fs::write(&source, "v1").unwrap();
        let target = dir.path().join("nested").join("target");

        let r = HardlinkResource::new(
            source.clone(),
            target.clone(),
            Arc::new(SystemFileSystemOps),
        );
        r.apply().unwrap();
        std::fs::write(&source, "v2").unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "v2");
        assert_eq!(r.current_state().unwrap(), ResourceState::Correct);
    }

    #[test]
    fn hard_linking_a_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("srcdir");
        std::fs::create_dir(&source).unwrap();
        let r = HardlinkResource::new(
            source,
            dir.path().join("link"),
            Arc::new(SystemFileSystemOps),
        );
        assert!(r.apply().is_err());
    }
}
