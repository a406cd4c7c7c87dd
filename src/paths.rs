//! Home directory lookup and `~` expansion for destination paths.
use std::path::{Component, Path, PathBuf};

use crate::error::PathError;

/// Environment variables holding the home directory, in lookup order.
#[cfg(windows)]
const HOME_VARS: [&str; 2] = ["USERPROFILE", "HOME"];
#[cfg(not(windows))]
const HOME_VARS: [&str; 1] = ["HOME"];

/// Resolve the current user's home directory from the environment.
///
/// # Errors
///
/// Returns [`PathError::HomeNotSet`] if none of the variables is set to a
/// non-empty value.
pub fn home_dir() -> Result<PathBuf, PathError> {
    HOME_VARS
        .iter()
        .find_map(|var| std::env::var_os(var).filter(|v| !v.is_empty()))
        .map(PathBuf::from)
        .ok_or(PathError::HomeNotSet(HOME_VARS[0]))
}

/// Expand a leading `~` in a destination to `home`.
///
/// Only `~` and `~/...` are expanded; `~user/...` and every other path are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use dotlink::paths::expand_home;
///
/// let home = Path::new("/home/me");
/// assert_eq!(expand_home("~/.gitconfig", home), PathBuf::from("/home/me/.gitconfig"));
/// assert_eq!(expand_home("~", home), PathBuf::from("/home/me"));
/// assert_eq!(expand_home("/etc/hosts", home), PathBuf::from("/etc/hosts"));
/// assert_eq!(expand_home("~bob/.x", home), PathBuf::from("~bob/.x"));
/// ```
#[must_use]
pub fn expand_home(destination: &str, home: &Path) -> PathBuf {
    if destination == "~" {
        return home.to_path_buf();
    }
    destination
        .strip_prefix("~/")
        .or_else(|| destination.strip_prefix("~\\"))
        .map_or_else(|| PathBuf::from(destination), |rest| home.join(rest))
}

/// Lexically remove `.` and `..` components without touching the
/// filesystem.
///
/// Symlinks are not resolved, so the parent directory of a
/// linked target stays the directory that lists it.
#[must_use]
pub fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Render `path` relative to `base` when it lives below it.
#[must_use]
pub fn display_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .ok()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(path)
        .display()
        .to_string()
}
