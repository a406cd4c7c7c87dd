//! Filesystem operation abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that resources and the engine can
//! be unit-tested without touching the real filesystem.  Production code
//! uses [`SystemFileSystemOps`]; tests use `MockFileSystemOps`.

use std::io;
use std::path::{Path, PathBuf};

/// What `lstat` reports for a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Nothing at the path.
    Missing,
    /// A regular file.
    File,
    /// A real directory (not a link to one).
    Dir,
    /// A symbolic link, dangling or not.
    Symlink,
}

/// Abstraction over the filesystem primitives used by dotlink.
///
/// Implement this trait to swap in a mock during unit tests, keeping
/// resource and engine logic independent of real I/O.  The production
/// implementation is [`SystemFileSystemOps`].
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Classify `path` without following a final symlink.
    fn entry_kind(&self, path: &Path) -> EntryKind;

    /// Returns `true` if anything, including a dangling symlink, is at `path`.
    fn exists(&self, path: &Path) -> bool {
        self.entry_kind(path) != EntryKind::Missing
    }

    /// Returns `true` if `path` is a directory, following symlinks.
    fn is_dir(&self, path: &Path) -> bool;

    /// Returns the immediate child paths inside `path`, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be opened or read as a directory.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Read the target of the symbolic link at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a symlink or cannot be read.
    fn read_link(&self, path: &Path) -> io::Result<PathBuf>;

    /// Returns `true` if both paths resolve to the same underlying file.
    ///
    /// Symlinks are followed. A path that cannot be resolved is never the
    /// same file as anything.
    fn same_file(&self, a: &Path, b: &Path) -> bool;

    /// Resolve `path` to an absolute path with every symlink followed.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` does not exist.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// Create `path` and any missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create a symbolic link at `link` pointing to `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if `link` already exists or cannot be created.
    fn symlink(&self, source: &Path, link: &Path) -> io::Result<()>;

    /// Create a hard link at `link` to the file at `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if `source` is not a file or `link` cannot be created.
    fn hard_link(&self, source: &Path, link: &Path) -> io::Result<()>;

    /// Copy the regular file at `source` to `dest`.
    ///
    /// # Errors
    ///
    /// Returns an error if `source` cannot be read or `dest` written.
    fn copy_file(&self, source: &Path, dest: &Path) -> io::Result<()>;

    /// Remove whatever is at `path`.
    ///
    /// Real directories are removed recursively.  Files and symlinks are
    /// unlinked; a symlink to a directory never touches the directory.
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails.
    fn remove_all(&self, path: &Path) -> io::Result<()>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn entry_kind(&self, path: &Path) -> EntryKind {
        match std::fs::symlink_metadata(path) {
            Err(_) => EntryKind::Missing,
            Ok(meta) if meta.is_symlink() => EntryKind::Symlink,
            Ok(meta) if meta.is_dir() => EntryKind::Dir,
            Ok(_) => EntryKind::File,
        }
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut entries = std::fs::read_dir(path)?
            .map(|e| e.map(|entry| entry.path()))
            .collect::<io::Result<Vec<_>>>()?;
        entries.sort();
        Ok(entries)
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::read_link(path)
    }

    #[cfg(unix)]
    fn same_file(&self, a: &Path, b: &Path) -> bool {
        use std::os::unix::fs::MetadataExt as _;
        match (std::fs::metadata(a), std::fs::metadata(b)) {
            (Ok(ma), Ok(mb)) => ma.dev() == mb.dev() && ma.ino() == mb.ino(),
            _ => false,
        }
    }

    #[cfg(not(unix))]
    fn same_file(&self, a: &Path, b: &Path) -> bool {
        match (dunce::canonicalize(a), dunce::canonicalize(b)) {
            (Ok(ca), Ok(cb)) => ca == cb,
            _ => false,
        }
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        dunce::canonicalize(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn symlink(&self, source: &Path, link: &Path) -> io::Result<()> {
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(source, link)
        }
        #[cfg(windows)]
        {
            if source.is_dir() {
                std::os::windows::fs::symlink_dir(source, link)
            } else {
                std::os::windows::fs::symlink_file(source, link)
            }
        }
        #[cfg(not(any(unix, windows)))]
        {
            let _ = (source, link);
            Err(io::Error::from(io::ErrorKind::Unsupported))
        }
    }

    fn hard_link(&self, source: &Path, link: &Path) -> io::Result<()> {
        std::fs::hard_link(source, link)
    }

    fn copy_file(&self, source: &Path, dest: &Path) -> io::Result<()> {
        std::fs::copy(source, dest).map(|_| ())
    }

    fn remove_all(&self, path: &Path) -> io::Result<()> {
        let meta = std::fs::symlink_metadata(path)?;
        if meta.is_dir() {
            return std::fs::remove_dir_all(path);
        }
        #[cfg(windows)]
        {
            // Directory symlinks are removed with remove_dir on Windows.
            if meta.is_symlink() && path.is_dir() {
                return std::fs::remove_dir(path);
            }
        }
        std::fs::remove_file(path)
    }
}

/// In-memory node kept by `MockFileSystemOps`.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
enum MockNode {
    /// A file; hard links share the same inode number.
    File { inode: u64 },
    Dir,
    Symlink(PathBuf),
}

#[cfg(test)]
#[derive(Debug, Default)]
struct MockTree {
    nodes: std::collections::BTreeMap<PathBuf, MockNode>,
    next_inode: u64,
}

#[cfg(test)]
impl MockTree {
    fn new_inode(&mut self) -> u64 {
        self.next_inode += 1;
        self.next_inode
    }

    /// Follow the symlink chain at `path` (final component only).
    fn resolve(&self, path: &Path) -> Option<(PathBuf, &MockNode)> {
        let mut current = path.to_path_buf();
        for _ in 0..32 {
            match self.nodes.get(&current)? {
                MockNode::Symlink(target) => current = target.clone(),
                node => return Some((current, node)),
            }
        }
        None
    }

    fn parent_is_dir(&self, path: &Path) -> bool {
        path.parent().is_none_or(|p| {
            p.as_os_str().is_empty() || self.resolve(p).is_some_and(|(_, n)| *n == MockNode::Dir)
        })
    }

    fn insert_new(&mut self, path: &Path, node: MockNode) -> io::Result<()> {
        if self.nodes.contains_key(path) {
            return Err(io::Error::from(io::ErrorKind::AlreadyExists));
        }
        if !self.parent_is_dir(path) {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        self.nodes.insert(path.to_path_buf(), node);
        Ok(())
    }
}

/// Mock [`FileSystemOps`] for unit tests.
///
/// Keeps an in-memory tree of files, directories and symlinks.  Paths are
/// compared literally, and only a symlink in the final path component is
/// followed, so tests should use absolute link targets.
///
/// # Example
///
/// ```ignore
/// use dotlink::operations::MockFileSystemOps;
///
/// let fs = MockFileSystemOps::new()
///     .with_file("/repo/git/gitconfig")
///     .with_symlink("/home/.gitconfig", "/repo/git/gitconfig");
/// ```
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockFileSystemOps {
    tree: std::sync::Mutex<MockTree>,
}

#[cfg(test)]
impl MockFileSystemOps {
    /// Create an empty mock with nothing configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockTree> {
        self.tree
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn with_node(
        self,
        path: impl Into<PathBuf>,
        node: impl FnOnce(&mut MockTree) -> MockNode,
    ) -> Self {
        let path = path.into();
        {
            let mut tree = self.lock();
            let ancestors: Vec<PathBuf> = path
                .ancestors()
                .skip(1)
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .collect();
            for dir in ancestors {
                tree.nodes.entry(dir).or_insert(MockNode::Dir);
            }
            let node = node(&mut *tree);
            tree.nodes.insert(path, node);
        }
        self
    }

    /// Add a regular file, creating its parent directories.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>) -> Self {
        self.with_node(path, |tree| MockNode::File {
            inode: tree.new_inode(),
        })
    }

    /// Add a directory and its ancestors.
    #[must_use]
    pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
        self.with_node(path, |_| MockNode::Dir)
    }

    /// Add a symbolic link at `path` pointing to `target`.
    #[must_use]
    pub fn with_symlink(self, path: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        let target = target.into();
        self.with_node(path, |_| MockNode::Symlink(target))
    }
}

#[cfg(test)]
impl FileSystemOps for MockFileSystemOps {
    fn entry_kind(&self, path: &Path) -> EntryKind {
        match self.lock().nodes.get(path) {
            None => EntryKind::Missing,
            Some(MockNode::File { .. }) => EntryKind::File,
            Some(MockNode::Dir) => EntryKind::Dir,
            Some(MockNode::Symlink(_)) => EntryKind::Symlink,
        }
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.lock()
            .resolve(path)
            .is_some_and(|(_, node)| *node == MockNode::Dir)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let tree = self.lock();
        let Some((dir, MockNode::Dir)) = tree.resolve(path) else {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        };
        Ok(tree
            .nodes
            .keys()
            .filter(|p| p.parent() == Some(dir.as_path()))
            .filter_map(|p| p.file_name())
            .map(|name| path.join(name))
            .collect())
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        match self.lock().nodes.get(path) {
            Some(MockNode::Symlink(target)) => Ok(target.clone()),
            Some(_) => Err(io::Error::from(io::ErrorKind::InvalidInput)),
            None => Err(io::Error::from(io::ErrorKind::NotFound)),
        }
    }

    fn same_file(&self, a: &Path, b: &Path) -> bool {
        let tree = self.lock();
        match (tree.resolve(a), tree.resolve(b)) {
            (Some((_, MockNode::File { inode: ia })), Some((_, MockNode::File { inode: ib }))) => {
                ia == ib
            }
            (Some((pa, MockNode::Dir)), Some((pb, MockNode::Dir))) => pa == pb,
            _ => false,
        }
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        self.lock()
            .resolve(path)
            .map(|(p, _)| p)
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut tree = self.lock();
        for dir in path.ancestors().filter(|p| !p.as_os_str().is_empty()) {
            match tree.nodes.get(dir) {
                None => {
                    tree.nodes.insert(dir.to_path_buf(), MockNode::Dir);
                }
                Some(MockNode::Dir) => {}
                Some(_) if tree.resolve(dir).is_some_and(|(_, n)| *n == MockNode::Dir) => {}
                Some(_) => return Err(io::Error::from(io::ErrorKind::AlreadyExists)),
            }
        }
        Ok(())
    }

    fn symlink(&self, source: &Path, link: &Path) -> io::Result<()> {
        self.lock()
            .insert_new(link, MockNode::Symlink(source.to_path_buf()))
    }

    fn hard_link(&self, source: &Path, link: &Path) -> io::Result<()> {
        let mut tree = self.lock();
        let inode = match tree.resolve(source) {
            Some((_, MockNode::File { inode })) => *inode,
            Some(_) => return Err(io::Error::from(io::ErrorKind::PermissionDenied)),
            None => return Err(io::Error::from(io::ErrorKind::NotFound)),
        };
        tree.insert_new(link, MockNode::File { inode })
    }

    fn copy_file(&self, source: &Path, dest: &Path) -> io::Result<()> {
        let mut tree = self.lock();
        if !matches!(tree.resolve(source), Some((_, MockNode::File { .. }))) {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        if !tree.parent_is_dir(dest) {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        let inode = tree.new_inode();
        tree.nodes
            .insert(dest.to_path_buf(), MockNode::File { inode });
        Ok(())
    }

    fn remove_all(&self, path: &Path) -> io::Result<()> {
        let mut tree = self.lock();
        match tree.nodes.get(path) {
            None => Err(io::Error::from(io::ErrorKind::NotFound)),
            Some(MockNode::Dir) => {
                tree.nodes.retain(|p, _| !p.starts_with(path));
                Ok(())
            }
            Some(_) => {
                tree.nodes.remove(path);
                Ok(())
            }
        }
    }
}
