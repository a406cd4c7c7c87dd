//! Symlink resource.
use anyhow::{Context as _, Result};
use std::path::PathBuf;
use std::sync::Arc;

use super::{Resource, ResourceState};
use crate::operations::{EntryKind, FileSystemOps};

/// A symlink at `target` pointing to `source`.
#[derive(Debug, Clone)]
pub struct SymlinkResource {
    /// The source file/directory (what the symlink points to).
    pub source: PathBuf,
    /// The target path (where the symlink will be created).
    pub target: PathBuf,
    fs_ops: Arc<dyn FileSystemOps>,
}

impl SymlinkResource {
    /// Create a new symlink resource.
    #[must_use]
    pub fn new(source: PathBuf, target: PathBuf, fs_ops: Arc<dyn FileSystemOps>) -> Self {
        Self {
            source,
            target,
            fs_ops,
        }
    }
}

impl Resource for SymlinkResource {
    fn description(&self) -> String {
        format!("{} -> {}", self.target.display(), self.source.display())
    }

    fn apply(&self) -> Result<()> {
        super::helpers::fs::ensure_parent_dir(&*self.fs_ops, &self.target)?;
        self.fs_ops
            .symlink(&self.source, &self.target)
            .with_context(|| format!("create link: {}", self.target.display()))
    }

    fn remove(&self) -> Result<()> {
        self.fs_ops
            .remove_all(&self.target)
            .with_context(|| format!("remove link: {}", self.target.display()))
    }

    fn current_state(&self) -> Result<ResourceState> {
        let state = match self.fs_ops.entry_kind(&self.target) {
            EntryKind::Missing => ResourceState::Missing,
            EntryKind::Symlink if self.fs_ops.same_file(&self.target, &self.source) => {
                ResourceState::Correct
            }
            EntryKind::Symlink => {
                let existing = self
                    .fs_ops
                    .read_link(&self.target)
                    .with_context(|| format!("read link: {}", self.target.display()))?;
                ResourceState::Incorrect {
                    current: format!("points to {}", existing.display()),
                }
            }
            EntryKind::File => ResourceState::Incorrect {
                current: "regular file, not a symlink".to_string(),
            },
            EntryKind::Dir => ResourceState::Incorrect {
                current: "directory, not a symlink".to_string(),
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
    use std::path::Path;

    fn mock_resource(fs: MockFileSystemOps) -> SymlinkResource {
        SymlinkResource::new(
            PathBuf::from("/repo/git/gitconfig"),
            PathBuf::from("/home/.gitconfig"),
            Arc::new(fs),
        )
    }

    #[test]
    fn description_shows_link_direction() {
        let r = mock_resource(MockFileSystemOps::new());
        assert_eq!(r.description(), "/home/.gitconfig -> /repo/git/gitconfig");
    }

    #[test]
    fn missing_when_target_absent() {
        let r = mock_resource(MockFileSystemOps::new().with_file("/repo/git/gitconfig"));
        assert_eq!(r.current_state().unwrap(), ResourceState::Missing);
    }

    #[test]
    fn correct_when_link_points_to_source() {
        let r = mock_resource(
            MockFileSystemOps::new()
                .with_file("/repo/git/gitconfig")
                .with_symlink("/home/.gitconfig", "/repo/git/gitconfig"),
        );
        assert_eq!(r.current_state().unwrap(), ResourceState::Correct);
    }

    #[test]
    fn incorrect_when_link_points_elsewhere() {
        let r = mock_resource(
            MockFileSystemOps::new()
                .with_file("/repo/git/gitconfig")
                .with_file("/other/gitconfig")
                .with_symlink("/home/.gitconfig", "/other/gitconfig"),
        );
        assert_eq!(
            r.current_state().unwrap(),
            ResourceState::Incorrect {
                current: "points to /other/gitconfig".to_string()
            }
        );
    }

    #[test]
    fn incorrect_when_target_is_plain_copy() {
        let r = mock_resource(
            MockFileSystemOps::new()
                .with_file("/repo/git/gitconfig")
                .with_file("/home/.gitconfig"),
        );
        assert!(matches!(
            r.current_state().unwrap(),
            ResourceState::Incorrect { .. }
        ));
    }

    #[test]
    fn apply_creates_parent_and_link() {
        let fs = Arc::new(MockFileSystemOps::new().with_file("/repo/nvim/init.lua"));
        let r = SymlinkResource::new(
            PathBuf::from("/repo/nvim/init.lua"),
            PathBuf::from("/home/.config/nvim/init.lua"),
            Arc::clone(&fs) as Arc<dyn FileSystemOps>,
        );
        r.apply().unwrap();
        assert_eq!(
            fs.entry_kind(Path::new("/home/.config/nvim/init.lua")),
            EntryKind::Symlink
        );
        assert_eq!(r.current_state().unwrap(), ResourceState::Correct);

        r.remove().unwrap();
        assert_eq!(r.current_state().unwrap(), ResourceState::Missing);
        assert!(fs.exists(Path::new("/repo/nvim/init.lua")));
    }

    #[cfg(unix)]
    #[test]
    fn real_symlink_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        std::fs::write(&source, "content").unwrap();
        let target = dir.path().join("home").join(".source");

        let r = SymlinkResource::new(
            source.clone(),
            target.clone(),
            Arc::new(SystemFileSystemOps),
        );
        assert_eq!(r.current_state().unwrap(), ResourceState::Missing);
        r.apply().unwrap();
        assert_eq!(std::fs::read_link(&target).unwrap(), source);
        assert_eq!(r.current_state().unwrap(), ResourceState::Correct);
        r.remove().unwrap();
        assert!(target.symlink_metadata().is_err());
        assert!(source.exists());
    }

    #[cfg(unix)]
    #[test]
    fn dangling_link_is_incorrect() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        std::fs::write(&source, "content").unwrap();
        let target = dir.path().join("link");
        std::os::unix::fs::symlink(dir.path().join("gone"), &target).unwrap();

        let r = SymlinkResource::new(source, target, Arc::new(SystemFileSystemOps));
        assert!(matches!(
            r.current_state().unwrap(),
            ResourceState::Incorrect { .. }
        ));
    }
}
