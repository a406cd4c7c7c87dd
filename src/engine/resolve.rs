//! Match one target path to its directive via the sibling `dotlink.conf`.
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::{ConfigScope, Directive, validation};
use crate::context::Context;
use crate::error::ConfigError;
use crate::paths;

/// A target paired with the directive that applies to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAction {
    /// Absolute path of the target inside the dotfiles tree.
    pub source: PathBuf,
    /// Destination with `~` already expanded.  Empty for `ignore` entries
    /// that carry no value.
    pub destination: PathBuf,
    /// How the target is placed.
    pub directive: Directive,
}

/// Outcome of looking a target up in its directory's config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The target's directory has no `dotlink.conf`.
    NoConfig,
    /// The config exists but does not list the target's base name.
    Unmatched,
    /// The config lists the target under a directive.
    Matched(ResolvedAction),
}

/// Resolves targets, re-reading config files on every lookup.
///
/// Validation warnings are logged once per config file per run.
#[derive(Debug)]
pub struct Resolver<'a> {
    ctx: &'a Context,
    validated: HashSet<PathBuf>,
}

impl<'a> Resolver<'a> {
    /// Create a resolver for one command invocation.
    #[must_use]
    pub fn new(ctx: &'a Context) -> Self {
        Self {
            ctx,
            validated: HashSet::new(),
        }
    }

    /// Determine which directive, if any, applies to `target`.
    ///
    /// Performs no filesystem mutation.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file in the target's directory exists
    /// but cannot be read or parsed.
    pub fn resolve(&mut self, target: &Path) -> Result<Resolution, ConfigError> {
        let (Some(dir), Some(name)) = (target.parent(), target.file_name()) else {
            return Ok(Resolution::NoConfig);
        };
        let Some(scope) = ConfigScope::load(dir)? else {
            return Ok(Resolution::NoConfig);
        };
        self.validate_once(&scope);

        let name = name.to_string_lossy();
        Ok(scope
            .lookup(&name)
            .map_or(Resolution::Unmatched, |(directive, destination)| {
                Resolution::Matched(ResolvedAction {
                    source: target.to_path_buf(),
                    destination: paths::expand_home(destination, &self.ctx.home),
                    directive,
                })
            }))
    }

    fn validate_once(&mut self, scope: &ConfigScope) {
        if !self.validated.insert(scope.file.clone()) {
            return;
        }
        for warning in validation::validate_scope(scope, self.ctx.fs_ops.as_ref()) {
            self.ctx.log.warn(&format!(
                "{} [{}]: {}",
                paths::display_relative(Path::new(&warning.source), &self.ctx.root),
                warning.item,
                warning.message
            ));
        }
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
    use crate::context::test_helpers::context;
    use crate::operations::SystemFileSystemOps;
    use std::sync::Arc;

    fn repo(conf: Option<&str>, files: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let git = dir.path().join("git");
        std::fs::create_dir(&git).unwrap();
        if let Some(conf) = conf {
            std::fs::write(git.join("dotlink.conf"), conf).unwrap();
        }
        for f in files {
            std::fs::write(git.join(f), "").unwrap();
        }
        dir
    }

    #[test]
    fn matched_expands_home() {
        let dir = repo(Some("[slink]\ngitconfig=~/.gitconfig\n"), &["gitconfig"]);
        let root = dir.path().to_str().unwrap();
        let (ctx, log) = context(root, "/home/me", false, Arc::new(SystemFileSystemOps));
        let target = dir.path().join("git/gitconfig");

        let resolution = Resolver::new(&ctx).resolve(&target).unwrap();
        assert_eq!(
            resolution,
            Resolution::Matched(ResolvedAction {
                source: target,
                destination: PathBuf::from("/home/me/.gitconfig"),
                directive: Directive::Slink,
            })
        );
        assert!(log.at("warn").is_empty());
    }

    #[test]
    fn no_config_and_unmatched_are_distinct() {
        let dir = repo(None, &["gitconfig"]);
        let (ctx, _log) = context("/", "/h", false, Arc::new(SystemFileSystemOps));
        assert_eq!(
            Resolver::new(&ctx)
                .resolve(&dir.path().join("git/gitconfig"))
                .unwrap(),
            Resolution::NoConfig
        );

        let dir = repo(Some("[slink]\nother=~/.other\n"), &["gitconfig", "other"]);
        assert_eq!(
            Resolver::new(&ctx)
                .resolve(&dir.path().join("git/gitconfig"))
                .unwrap(),
            Resolution::Unmatched
        );
    }

    #[test]
    fn ignore_wins_over_slink() {
        let dir = repo(Some("[slink]\nREADME=~/README\n[ignore]\nREADME\n"), &["README"]);
        let (ctx, log) = context("/", "/h", false, Arc::new(SystemFileSystemOps));
        let Resolution::Matched(action) = Resolver::new(&ctx)
            .resolve(&dir.path().join("git/README"))
            .unwrap()
        else {
            panic!("expected a match");
        };
        assert_eq!(action.directive, Directive::Ignore);
        assert_eq!(log.at("warn").len(), 1, "duplicate should be reported");
    }

    #[test]
    fn warnings_emitted_once_per_scope() {
        let dir = repo(Some("[copy]\nghost=/tmp/ghost\n"), &["a", "b"]);
        let (ctx, log) = context("/", "/h", false, Arc::new(SystemFileSystemOps));
        let mut resolver = Resolver::new(&ctx);
        resolver.resolve(&dir.path().join("git/a")).unwrap();
        resolver.resolve(&dir.path().join("git/b")).unwrap();
        assert_eq!(log.at("warn").len(), 1, "{:?}", log.at("warn"));
    }

    #[test]
    fn unknown_directive_is_an_error() {
        let dir = repo(Some("[symlink]\na=~/.a\n"), &["a"]);
        let (ctx, _log) = context("/", "/h", false, Arc::new(SystemFileSystemOps));
        let err = Resolver::new(&ctx)
            .resolve(&dir.path().join("git/a"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownDirective { .. }), "{err}");
    }

    #[test]
    fn root_path_has_no_config() {
        let (ctx, _log) = context("/", "/h", false, Arc::new(SystemFileSystemOps));
        assert_eq!(
            Resolver::new(&ctx).resolve(Path::new("/")).unwrap(),
            Resolution::NoConfig
        );
    }
}
