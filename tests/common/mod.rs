// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed dotfiles tree and home directory with
// a fluent builder, plus a recording logger, so each integration test can set
// up an isolated environment without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use dotlink::commands;
use dotlink::context::Context;
use dotlink::engine::Operation;
use dotlink::logging::{Log, TargetStatus};
use dotlink::operations::SystemFileSystemOps;

/// A [`Log`] that keeps every message as `"<level>: <msg>"` and every
/// recorded target.
#[derive(Debug, Default)]
pub struct RecordingLog {
    lines: Mutex<Vec<String>>,
    targets: Mutex<Vec<(String, TargetStatus)>>,
}

impl RecordingLog {
    fn push(&self, level: &str, msg: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(format!("{level}: {msg}"));
    }

    /// Every line in order.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Lines logged at `level`, without the prefix.
    pub fn at(&self, level: &str) -> Vec<String> {
        let prefix = format!("{level}: ");
        self.lines()
            .iter()
            .filter_map(|l| l.strip_prefix(&prefix).map(String::from))
            .collect()
    }

    /// Recorded `(name, status)` pairs in order.
    pub fn targets(&self) -> Vec<(String, TargetStatus)> {
        self.targets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Recorded statuses in order.
    pub fn statuses(&self) -> Vec<TargetStatus> {
        self.targets().into_iter().map(|(_, s)| s).collect()
    }
}

impl Log for RecordingLog {
    fn stage(&self, msg: &str) {
        self.push("stage", msg);
    }
    fn info(&self, msg: &str) {
        self.push("info", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }
    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
    fn dry_run(&self, msg: &str) {
        self.push("dry_run", msg);
    }
    fn conflict(&self, msg: &str) {
        self.push("conflict", msg);
    }
    fn record_target(&self, name: &str, status: TargetStatus, _message: Option<&str>) {
        self.targets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((name.to_string(), status));
    }
}

/// An isolated dotfiles tree (`repo/`) and home directory (`home/`) backed
/// by a [`tempfile::TempDir`].
pub struct TestTree {
    dir: tempfile::TempDir,
    root: PathBuf,
    home: PathBuf,
}

impl TestTree {
    /// Create empty `repo/` and `home/` directories.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let base = dunce::canonicalize(dir.path()).expect("canonicalize temp dir");
        let root = base.join("repo");
        let home = base.join("home");
        std::fs::create_dir_all(&root).expect("create repo dir");
        std::fs::create_dir_all(&home).expect("create home dir");
        Self { dir, root, home }
    }

    /// Add a file under the repo, creating parent directories.
    #[must_use]
    pub fn with_file(self, rel: &str, content: &str) -> Self {
        let path = self.root.join(rel);
        std::fs::create_dir_all(path.parent().expect("file has a parent")).expect("create parent");
        std::fs::write(&path, content).expect("write file");
        self
    }

    /// Write `dotlink.conf` into the repo directory `dir` (`""` for the root).
    #[must_use]
    pub fn with_config(self, dir: &str, content: &str) -> Self {
        let rel = if dir.is_empty() {
            "dotlink.conf".to_string()
        } else {
            format!("{dir}/dotlink.conf")
        };
        self.with_file(&rel, content)
    }

    /// Add a file directly under the home directory.
    #[must_use]
    pub fn with_home_file(self, rel: &str, content: &str) -> Self {
        let path = self.home.join(rel);
        std::fs::create_dir_all(path.parent().expect("file has a parent")).expect("create parent");
        std::fs::write(&path, content).expect("write home file");
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Path of `rel` under the home directory.
    pub fn home_path(&self, rel: &str) -> PathBuf {
        self.home.join(rel)
    }

    /// Build a context over the real filesystem with a fresh log.
    pub fn context(&self, dry_run: bool) -> (Context, Arc<RecordingLog>) {
        let log = Arc::new(RecordingLog::default());
        let ctx = Context {
            root: self.root.clone(),
            home: self.home.clone(),
            dry_run,
            verbose: dry_run,
            log: Arc::clone(&log) as Arc<dyn Log>,
            fs_ops: Arc::new(SystemFileSystemOps),
        };
        (ctx, log)
    }

    /// Run `operation` over `targets` and return the log.
    pub fn run(&self, operation: Operation, dry_run: bool, targets: &[&str]) -> Arc<RecordingLog> {
        let (ctx, log) = self.context(dry_run);
        let targets: Vec<PathBuf> = targets.iter().map(PathBuf::from).collect();
        commands::run_targets(&ctx, operation, &targets).expect("run targets");
        log
    }

    /// Snapshot of every path under home, with symlinks shown as `a -> b`
    /// relative to the temp dir.
    pub fn home_listing(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.list(&self.home, &mut out);
        out.sort();
        out
    }

    fn list(&self, dir: &Path, out: &mut Vec<String>) {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return;
        };
        let base = self.dir.path();
        let base = dunce::canonicalize(base).unwrap_or_else(|_| base.to_path_buf());
        for entry in entries.flatten() {
            let path = entry.path();
            let rel = path
                .strip_prefix(&self.home)
                .unwrap_or(&path)
                .display()
                .to_string()
                .replace('\\', "/");
            let meta = std::fs::symlink_metadata(&path).expect("lstat");
            if meta.file_type().is_symlink() {
                let target = std::fs::read_link(&path).expect("read link");
                let target = target.strip_prefix(&base).unwrap_or(&target);
                out.push(format!(
                    "{rel} -> {}",
                    target.display().to_string().replace('\\', "/")
                ));
            } else if meta.is_dir() {
                out.push(format!("{rel}/"));
                self.list(&path, out);
            } else {
                out.push(rel);
            }
        }
    }
}
