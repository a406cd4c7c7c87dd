//! Expansion of directory targets into their immediate children.
use std::path::{Path, PathBuf};

use crate::config::CONFIG_FILE_NAME;
use crate::error::WalkError;
use crate::operations::FileSystemOps;

/// Tracks the chain of directories being expanded for one top-level target.
///
/// Entering a directory whose canonical path is already on the chain means
/// a symlink loops back into the tree, which is reported as
/// [`WalkError::Cycle`] instead of recursing forever.
#[derive(Debug, Default)]
pub struct Walker {
    chain: Vec<PathBuf>,
}

impl Walker {
    /// Create a walker with an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `dir` and list its children, sorted, without the config file.
    ///
    /// Every successful call must be paired with [`leave`](Self::leave) once
    /// the children have been processed.
    ///
    /// # Errors
    ///
    /// Returns [`WalkError::Cycle`] if `dir` is already being expanded, or
    /// [`WalkError::ReadDir`] if it cannot be resolved or listed.
    pub fn enter(
        &mut self,
        fs_ops: &dyn FileSystemOps,
        dir: &Path,
    ) -> Result<Vec<PathBuf>, WalkError> {
        let canonical = fs_ops
            .canonicalize(dir)
            .map_err(|source| WalkError::ReadDir {
                path: dir.to_path_buf(),
                source,
            })?;
        if self.chain.contains(&canonical) {
            return Err(WalkError::Cycle {
                path: dir.to_path_buf(),
                canonical,
            });
        }

        let children = fs_ops
            .read_dir(dir)
            .map_err(|source| WalkError::ReadDir {
                path: dir.to_path_buf(),
                source,
            })?
            .into_iter()
            .filter(|child| child.file_name().is_none_or(|n| n != CONFIG_FILE_NAME))
            .collect();

        self.chain.push(canonical);
        Ok(children)
    }

    /// Leave the most recently entered directory.
    pub fn leave(&mut self) {
        self.chain.pop();
    }
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::operations::{MockFileSystemOps, SystemFileSystemOps};

    #[test]
    fn children_exclude_config_file() {
        let fs = MockFileSystemOps::new()
            .with_file("/repo/git/dotlink.conf")
            .with_file("/repo/git/b")
            .with_file("/repo/git/a");
        let mut walker = Walker::new();
        let children = walker.enter(&fs, Path::new("/repo/git")).unwrap();
        assert_eq!(
            children,
            [PathBuf::from("/repo/git/a"), PathBuf::from("/repo/git/b")]
        );
        walker.leave();
        assert!(walker.enter(&fs, Path::new("/repo/git")).is_ok());
    }

    #[test]
    fn reentering_a_directory_on_the_chain_is_a_cycle() {
        let fs = MockFileSystemOps::new()
            .with_file("/repo/a/file")
            .with_symlink("/repo/a/loop", "/repo/a");
        let mut walker = Walker::new();
        walker.enter(&fs, Path::new("/repo/a")).unwrap();
        match walker.enter(&fs, Path::new("/repo/a/loop")) {
            Err(WalkError::Cycle { path, canonical }) => {
                assert_eq!(path, PathBuf::from("/repo/a/loop"));
                assert_eq!(canonical, PathBuf::from("/repo/a"));
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn sibling_revisit_after_leave_is_not_a_cycle() {
        let fs = MockFileSystemOps::new()
            .with_file("/repo/shared/x")
            .with_symlink("/repo/alias", "/repo/shared");
        let mut walker = Walker::new();
        walker.enter(&fs, Path::new("/repo/shared")).unwrap();
        walker.leave();
        let children = walker.enter(&fs, Path::new("/repo/alias")).unwrap();
        assert_eq!(children, [PathBuf::from("/repo/alias/x")]);
    }

    #[test]
    fn unreadable_directory_is_read_dir_error() {
        let fs = MockFileSystemOps::new();
        let err = Walker::new()
            .enter(&fs, Path::new("/missing"))
            .unwrap_err();
        assert!(matches!(err, WalkError::ReadDir { .. }), "{err}");
    }

    #[cfg(unix)]
    #[test]
    fn real_symlink_cycle_detected() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        std::fs::create_dir(&a).unwrap();
        std::os::unix::fs::symlink(&a, a.join("back")).unwrap();

        let mut walker = Walker::new();
        let children = walker.enter(&SystemFileSystemOps, &a).unwrap();
        assert_eq!(children, [a.join("back")]);
        let err = walker
            .enter(&SystemFileSystemOps, &a.join("back"))
            .unwrap_err();
        assert!(matches!(err, WalkError::Cycle { .. }), "{err}");
    }
}
