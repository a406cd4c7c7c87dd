pub mod completions;
pub mod install;
pub mod status;
pub mod uninstall;
pub mod version;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::context::Context;
use crate::engine::{self, Operation, Outcome, Resolution, ResolvedAction, Resolver, Walker};
use crate::error::WalkError;
use crate::logging::{Log, Logger, TargetStatus};
use crate::paths;

/// Environment variable naming the working root when `--root` is absent.
pub const ROOT_ENV: &str = "DOTLINK_ROOT";

/// Resolve the working root from `--root`, `DOTLINK_ROOT` or the current
/// directory, in that order.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined or the
/// chosen root cannot be canonicalised.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf> {
    let root = match (&global.root, std::env::var_os(ROOT_ENV)) {
        (Some(root), _) => root.clone(),
        (None, Some(env)) if !env.is_empty() => PathBuf::from(env),
        _ => std::env::current_dir().context("cannot determine current directory")?,
    };
    dunce::canonicalize(&root)
        .with_context(|| format!("cannot access dotfiles root {}", root.display()))
}

/// Build the run [`Context`] shared by install, uninstall and status.
///
/// # Errors
///
/// Returns an error if the root cannot be resolved or the home directory is
/// unknown.
pub fn setup(global: &GlobalOpts, verbose: bool, log: &Arc<Logger>) -> Result<Context> {
    Ok(Context::new(
        resolve_root(global)?,
        paths::home_dir()?,
        Arc::clone(log) as Arc<dyn Log>,
        global.dry_run,
        verbose,
    ))
}

/// Process every target, print the summary, and bail if any target failed.
///
/// # Errors
///
/// Returns an error on a fatal config or filesystem error, or if one or more
/// targets recorded a failure.
pub fn run_to_completion(
    ctx: &Context,
    operation: Operation,
    targets: &[PathBuf],
    log: &Logger,
) -> Result<()> {
    log.debug(&format!("root: {}", ctx.root.display()));
    log.debug(&format!("home: {}", ctx.home.display()));
    if ctx.dry_run {
        log.info("dry run: no changes will be made");
    }
    run_targets(ctx, operation, targets)?;

    log.print_summary();

    let count = log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} target(s) failed");
    }
    Ok(())
}

/// Run `operation` over `targets` in order, expanding directories that have
/// no directive of their own.
///
/// Relative targets are taken from the working root.  Per-target problems
/// are logged and recorded; only config and filesystem errors abort.  A
/// directory cycle, met while expanding or while copying, fails just the
/// target it was found under.
///
/// # Errors
///
/// Returns an error if a config file cannot be parsed, a directory cannot be
/// listed, or a filesystem mutation fails.
pub fn run_targets(ctx: &Context, operation: Operation, targets: &[PathBuf]) -> Result<()> {
    let mut resolver = Resolver::new(ctx);
    for target in targets {
        let path = paths::clean(&ctx.root.join(target));
        let mut walker = Walker::new();
        process(ctx, operation, &mut resolver, &mut walker, &path)?;
    }
    Ok(())
}

fn process(
    ctx: &Context,
    operation: Operation,
    resolver: &mut Resolver<'_>,
    walker: &mut Walker,
    path: &Path,
) -> Result<()> {
    let name = paths::display_relative(path, &ctx.root);
    if !ctx.fs_ops.exists(path) {
        skip(ctx, &name, "no such file or directory");
        return Ok(());
    }

    let resolution = resolver.resolve(path)?;
    if let Resolution::Matched(action) = resolution {
        match engine::execute::execute(ctx, operation, &action) {
            Ok(outcome) => report(ctx, &name, &action, &outcome),
            Err(err) => {
                let cycle = err
                    .chain()
                    .find_map(|e| e.downcast_ref::<WalkError>())
                    .filter(|e| matches!(e, WalkError::Cycle { .. }));
                let Some(cycle) = cycle else {
                    return Err(err.context(format!("failed to {operation} {name}")));
                };
                fail_cycle(ctx, &name, cycle);
            }
        }
        return Ok(());
    }

    if !ctx.fs_ops.is_dir(path) {
        let reason = match resolution {
            Resolution::NoConfig => "no dotlink.conf in its directory",
            _ => "no directive found",
        };
        skip(ctx, &name, reason);
        return Ok(());
    }

    match walker.enter(ctx.fs_ops.as_ref(), path) {
        Ok(children) => {
            ctx.log
                .debug(&format!("{name}: expanding {} entries", children.len()));
            for child in &children {
                process(ctx, operation, resolver, walker, child)?;
            }
            walker.leave();
            Ok(())
        }
        Err(err @ WalkError::Cycle { .. }) => {
            fail_cycle(ctx, &name, &err);
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn skip(ctx: &Context, name: &str, reason: &str) {
    ctx.log.warn(&format!("{name}: {reason}"));
    ctx.log
        .record_target(name, TargetStatus::Skipped, Some(reason));
}

fn fail_cycle(ctx: &Context, name: &str, err: &WalkError) {
    ctx.log.error(&format!("{name}: {err}"));
    ctx.log
        .record_target(name, TargetStatus::Failed, Some("directory cycle"));
}

fn report(ctx: &Context, name: &str, action: &ResolvedAction, outcome: &Outcome) {
    let log = &ctx.log;
    let dest = action.destination.display();
    let directive = action.directive;
    match outcome {
        // The executor already noted the change at debug level.
        Outcome::Installed | Outcome::Removed => {
            log.record_target(name, TargetStatus::Ok, None);
        }
        Outcome::StatusInstalled => {
            log.info(&format!("{name}: installed ({directive}) at {dest}"));
            log.record_target(name, TargetStatus::Ok, None);
        }
        Outcome::AlreadyInstalled => {
            log.warn(&format!("{name}: already installed at {dest}"));
            log.record_target(name, TargetStatus::Skipped, Some("already installed"));
        }
        Outcome::NotInstalled => {
            log.warn(&format!("{name}: not installed at {dest}"));
            log.record_target(name, TargetStatus::Skipped, Some("not installed"));
        }
        Outcome::Ignored => {
            log.debug(&format!("{name}: ignored"));
            log.record_target(name, TargetStatus::Ignored, None);
        }
        Outcome::WouldInstall => {
            log.dry_run(&format!("would {directive} {name} -> {dest}"));
            log.record_target(name, TargetStatus::DryRun, None);
        }
        Outcome::WouldRemove => {
            log.dry_run(&format!("would remove {dest}"));
            log.record_target(name, TargetStatus::DryRun, None);
        }
        Outcome::StatusMissing => {
            log.info(&format!("{name}: not installed ({directive}) at {dest}"));
            log.record_target(name, TargetStatus::Skipped, Some("not installed"));
        }
        Outcome::StatusConflict { reason } => {
            log.conflict(&format!("{name}: {dest}: {reason}"));
            log.record_target(name, TargetStatus::Conflict, Some(reason));
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::context::test_helpers::{RecordingLog, context};
    use crate::operations::{EntryKind, FileSystemOps, SystemFileSystemOps};
    use std::fs;

    struct Repo {
        dir: tempfile::TempDir,
    }

    impl Repo {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            fs::create_dir_all(dir.path().join("repo")).unwrap();
            fs::create_dir_all(dir.path().join("home")).unwrap();
            Self { dir }
        }

        fn root(&self) -> PathBuf {
            self.dir.path().join("repo")
        }

        fn home(&self) -> PathBuf {
            self.dir.path().join("home")
        }

        fn file(self, rel: &str, content: &str) -> Self {
            let path = self.root().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
            self
        }

        fn run(&self, operation: Operation, dry_run: bool, targets: &[&str]) -> Arc<RecordingLog> {
            let (ctx, log) = context(
                self.root().to_str().unwrap(),
                self.home().to_str().unwrap(),
                dry_run,
                Arc::new(SystemFileSystemOps),
            );
            let targets: Vec<PathBuf> = targets.iter().map(PathBuf::from).collect();
            run_targets(&ctx, operation, &targets).unwrap();
            log
        }
    }

    #[test]
    fn missing_target_is_skipped() {
        let log = Repo::new().run(Operation::Install, false, &["nope"]);
        assert_eq!(log.statuses(), [TargetStatus::Skipped]);
        assert_eq!(log.at("warn"), ["nope: no such file or directory"]);
    }

    #[test]
    fn file_without_config_is_skipped() {
        let log = Repo::new()
            .file("git/gitconfig", "")
            .run(Operation::Install, false, &["git/gitconfig"]);
        assert_eq!(log.statuses(), [TargetStatus::Skipped]);
        assert!(log.at("warn")[0].contains("no dotlink.conf"));
    }

    #[test]
    fn unlisted_file_is_skipped() {
        let log = Repo::new()
            .file("git/dotlink.conf", "[ignore]\nother\n")
            .file("git/other", "")
            .file("git/gitconfig", "")
            .run(Operation::Install, false, &["git/gitconfig"]);
        assert_eq!(log.statuses(), [TargetStatus::Skipped]);
        assert!(log.at("warn").iter().any(|w| w.ends_with("no directive found")));
    }

    #[test]
    fn directory_without_directive_is_expanded() {
        let repo = Repo::new()
            .file("git/dotlink.conf", "[slink]\na=~/.a\nb=~/.b\n")
            .file("git/a", "")
            .file("git/b", "");
        let log = repo.run(Operation::Install, false, &["git"]);
        assert_eq!(log.statuses(), [TargetStatus::Ok, TargetStatus::Ok]);
        assert_eq!(
            SystemFileSystemOps.entry_kind(&repo.home().join(".a")),
            EntryKind::Symlink
        );
        assert!(!repo.home().join("dotlink.conf").exists());
    }

    #[test]
    fn directory_with_directive_is_not_expanded() {
        let repo = Repo::new()
            .file("dotlink.conf", "[copy]\nnvim=~/.config/nvim\n")
            .file("nvim/dotlink.conf", "[slink]\ninit.lua=~/init.lua\n")
            .file("nvim/init.lua", "-- init");
        let log = repo.run(Operation::Install, false, &["nvim"]);
        assert_eq!(log.statuses(), [TargetStatus::Ok]);
        assert!(repo.home().join(".config/nvim/init.lua").is_file());
        assert!(!repo.home().join("init.lua").exists());
    }

    #[test]
    fn dry_run_records_intent_only() {
        let repo = Repo::new()
            .file("git/dotlink.conf", "[hlink]\ngitconfig=~/.gitconfig\n")
            .file("git/gitconfig", "");
        let log = repo.run(Operation::Install, true, &["git/gitconfig"]);
        assert_eq!(log.statuses(), [TargetStatus::DryRun]);
        assert_eq!(log.at("dry_run").len(), 1);
        assert!(!repo.home().join(".gitconfig").exists());
    }

    #[test]
    fn status_lines_for_each_outcome() {
        let repo = Repo::new()
            .file(
                "git/dotlink.conf",
                "[slink]\ngitconfig=~/.gitconfig\nmissing=~/.missing\n[ignore]\nREADME\n",
            )
            .file("git/gitconfig", "")
            .file("git/missing", "")
            .file("git/README", "");
        repo.run(Operation::Install, false, &["git/gitconfig"]);

        let log = repo.run(Operation::Status, false, &["git"]);
        assert_eq!(
            log.statuses(),
            [
                TargetStatus::Ignored,
                TargetStatus::Ok,
                TargetStatus::Skipped
            ]
        );
        assert_eq!(log.at("info").len(), 2);
    }

    #[test]
    fn relative_dotdot_targets_stay_under_parent_config() {
        let repo = Repo::new()
            .file("git/dotlink.conf", "[ignore]\ngitconfig\n")
            .file("git/gitconfig", "");
        let log = repo.run(Operation::Install, false, &["vim/../git/./gitconfig"]);
        assert_eq!(log.statuses(), [TargetStatus::Ignored]);
    }

    #[cfg(unix)]
    #[test]
    fn cycle_fails_only_its_branch() {
        let repo = Repo::new()
            .file("loop/dotlink.conf", "[ignore]\nx\n")
            .file("loop/x", "")
            .file("git/dotlink.conf", "[ignore]\ngitconfig\n")
            .file("git/gitconfig", "");
        std::os::unix::fs::symlink(repo.root().join("loop"), repo.root().join("loop/back"))
            .unwrap();

        let log = repo.run(Operation::Install, false, &["loop", "git/gitconfig"]);
        assert_eq!(
            log.statuses(),
            [
                TargetStatus::Failed,
                TargetStatus::Ignored,
                TargetStatus::Ignored
            ]
        );
        assert_eq!(log.at("error").len(), 1);
    }

    #[test]
    fn config_errors_are_fatal() {
        let repo = Repo::new()
            .file("git/dotlink.conf", "[symlink]\ngitconfig=~/.gitconfig\n")
            .file("git/gitconfig", "");
        let (ctx, _log) = context(
            repo.root().to_str().unwrap(),
            repo.home().to_str().unwrap(),
            false,
            Arc::new(SystemFileSystemOps),
        );
        let err = run_targets(&ctx, Operation::Install, &[PathBuf::from("git/gitconfig")])
            .unwrap_err();
        assert!(err.to_string().contains("unknown directive"), "{err}");
    }

    #[test]
    fn resolve_root_prefers_explicit_flag() {
        let dir = tempfile::tempdir().unwrap();
        let global = GlobalOpts {
            dry_run: false,
            root: Some(dir.path().join(".")),
        };
        assert_eq!(
            resolve_root(&global).unwrap(),
            dunce::canonicalize(dir.path()).unwrap()
        );
    }

    #[test]
    fn resolve_root_rejects_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let global = GlobalOpts {
            dry_run: false,
            root: Some(dir.path().join("absent")),
        };
        let err = resolve_root(&global).unwrap_err();
        assert!(err.to_string().contains("cannot access dotfiles root"), "{err}");
    }
}
