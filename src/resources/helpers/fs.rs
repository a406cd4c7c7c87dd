//! File-system resource helpers.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use crate::error::WalkError;
use crate::operations::FileSystemOps;

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// This is a shared helper for resource `apply()` methods that need to
/// create parent directories before writing a file or link.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(fs_ops: &dyn FileSystemOps, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs_ops
            .create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    Ok(())
}

/// Copy `src` to `dst`, recursing into directories.
///
/// Symlinks within the source tree are *followed*: directory symlinks are
/// recursed into and their contents materialised rather than copying the
/// link itself.  A directory link that leads back to a directory already
/// being copied stops the copy with [`WalkError::Cycle`].
///
/// # Errors
///
/// Returns an error if a directory cannot be created, a source directory
/// cannot be listed or resolved, a file cannot be copied, or the source
/// tree loops back into itself.
pub fn copy_recursive(fs_ops: &dyn FileSystemOps, src: &Path, dst: &Path) -> Result<()> {
    copy_tree(fs_ops, src, dst, &mut Vec::new())
}

/// `chain` holds the canonical paths of the source directories currently
/// being copied, outermost first.
fn copy_tree(
    fs_ops: &dyn FileSystemOps,
    src: &Path,
    dst: &Path,
    chain: &mut Vec<PathBuf>,
) -> Result<()> {
    if !fs_ops.is_dir(src) {
        return fs_ops
            .copy_file(src, dst)
            .with_context(|| format!("copying {} to {}", src.display(), dst.display()));
    }
    let canonical = fs_ops
        .canonicalize(src)
        .with_context(|| format!("resolving {}", src.display()))?;
    if chain.contains(&canonical) {
        return Err(WalkError::Cycle {
            path: src.to_path_buf(),
            canonical,
        }
        .into());
    }
    fs_ops
        .create_dir_all(dst)
        .with_context(|| format!("creating directory {}", dst.display()))?;
    let children = fs_ops
        .read_dir(src)
        .with_context(|| format!("reading directory {}", src.display()))?;
    chain.push(canonical);
    for src_path in children {
        let Some(name) = src_path.file_name() else {
            continue;
        };
        copy_tree(fs_ops, &src_path, &dst.join(name), chain)?;
    }
    chain.pop();
    Ok(())
}
