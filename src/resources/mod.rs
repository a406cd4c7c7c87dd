//! Per-directive filesystem primitives (check + apply + remove).
pub mod copy;
pub mod hardlink;
pub mod helpers;
pub mod symlink;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::config::Directive;
use crate::operations::FileSystemOps;

pub use copy::CopyResource;
pub use hardlink::HardlinkResource;
pub use symlink::SymlinkResource;

/// State of a destination relative to what its directive expects.
///
/// # Examples
///
/// ```
/// use dotlink::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let wrong = ResourceState::Incorrect { current: "regular file".into() };
///
/// assert_ne!(missing, ResourceState::Correct);
/// assert_ne!(wrong, ResourceState::Correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Nothing exists at the destination.
    Missing,
    /// The destination matches the directive.
    Correct,
    /// Something exists at the destination but it is not what the directive
    /// would have created.
    Incorrect {
        /// What was found instead.
        current: String,
    },
}

/// A destination that can be described, created, removed and inspected.
///
/// Implementations do not check for existing entries before creating one;
/// the executor decides whether `apply` or `remove` may run.
pub trait Resource: std::fmt::Debug {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Create the destination, including missing parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory, link or copy cannot be created.
    fn apply(&self) -> Result<()>;

    /// Delete the destination; directories are removed recursively.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be removed.
    fn remove(&self) -> Result<()>;

    /// Inspect the destination.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be inspected.
    fn current_state(&self) -> Result<ResourceState>;
}

/// Build the resource for `directive`, or `None` for [`Directive::Ignore`].
#[must_use]
pub fn for_directive(
    directive: Directive,
    source: PathBuf,
    target: PathBuf,
    fs_ops: Arc<dyn FileSystemOps>,
) -> Option<Box<dyn Resource>> {
    match directive {
        Directive::Slink => Some(Box::new(SymlinkResource::new(source, target, fs_ops))),
        Directive::Hlink => Some(Box::new(HardlinkResource::new(source, target, fs_ops))),
        Directive::Copy => Some(Box::new(CopyResource::new(source, target, fs_ops))),
        Directive::Ignore => None,
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::operations::MockFileSystemOps;

    #[test]
    fn ignore_has_no_resource() {
        let fs: Arc<dyn FileSystemOps> = Arc::new(MockFileSystemOps::new());
        assert!(
            for_directive(
                Directive::Ignore,
                PathBuf::from("/r/a"),
                PathBuf::from("/h/a"),
                fs
            )
            .is_none()
        );
    }

    #[test]
    fn every_other_directive_builds_a_resource() {
        let fs: Arc<dyn FileSystemOps> = Arc::new(MockFileSystemOps::new());
        for directive in [Directive::Slink, Directive::Hlink, Directive::Copy] {
            let resource = for_directive(
                directive,
                PathBuf::from("/r/a"),
                PathBuf::from("/h/a"),
                Arc::clone(&fs),
            )
            .expect("resource");
            assert!(resource.description().contains("/h/a"));
        }
    }
}
