//! Structured logger with dry-run awareness and summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::{CONFLICT_TARGET, DRY_RUN_TARGET, STAGE_TARGET};
use super::types::{Log, TargetEntry, TargetStatus};
use super::utils::log_file_path;

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
///
/// The `record_target` method is **not** included because its signature
/// differs from the `fn(&self, &str)` pattern shared by the display methods.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger with dry-run awareness and summary collection.
///
/// All messages are always written to a persistent log file at
/// `$XDG_CACHE_HOME/dotlink/<command>.log` (default `~/.cache/dotlink/<command>.log`)
/// with timestamps and ANSI codes stripped, regardless of the verbose flag.
#[derive(Debug)]
pub struct Logger {
    targets: Mutex<Vec<TargetEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a logger for `command`, whose log file lives under the cache
    /// directory.
    ///
    /// The file itself is created by
    /// [`init_subscriber`](super::subscriber::init_subscriber); this
    /// constructor only remembers where it is, for the summary.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self::with_log_file(log_file_path(command))
    }

    /// Create a logger whose summary points at `log_file`.
    #[must_use]
    pub const fn with_log_file(log_file: Option<PathBuf>) -> Self {
        Self {
            targets: Mutex::new(Vec::new()),
            log_file,
        }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Return a clone of all recorded target entries.
    #[must_use]
    pub fn entries(&self) -> Vec<TargetEntry> {
        self.targets.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Log a destination that holds something other than what its
    /// directive would create.
    pub fn conflict(&self, msg: &str) {
        tracing::warn!(target: CONFLICT_TARGET, "{msg}");
    }

    /// Record a target result for the summary.
    pub fn record_target(&self, name: &str, status: TargetStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.targets.lock() {
            guard.push(TargetEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Count the number of failed targets.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.targets.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|t| t.status == TargetStatus::Failed)
                .count()
        })
    }

    /// Print the summary of all recorded targets.
    pub fn print_summary(&self) {
        let targets = self.entries();
        if targets.is_empty() {
            return;
        }

        self.stage("Summary");

        let mut ok = 0u32;
        let mut ignored = 0u32;
        let mut skipped = 0u32;
        let mut dry_run = 0u32;
        let mut conflict = 0u32;
        let mut failed = 0u32;

        for target in &targets {
            let (icon, color) = match target.status {
                TargetStatus::Ok => {
                    ok += 1;
                    ("✓", "\x1b[32m")
                }
                TargetStatus::Ignored => {
                    ignored += 1;
                    ("·", "\x1b[2m")
                }
                TargetStatus::Skipped => {
                    skipped += 1;
                    ("○", "\x1b[33m")
                }
                TargetStatus::DryRun => {
                    dry_run += 1;
                    ("~", "\x1b[37m")
                }
                TargetStatus::Conflict => {
                    conflict += 1;
                    ("!", "\x1b[35m")
                }
                TargetStatus::Failed => {
                    failed += 1;
                    ("✗", "\x1b[31m")
                }
            };

            let suffix = target
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));

            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", target.name));
        }

        let counts = [
            ("\x1b[32m", ok, "ok"),
            ("\x1b[2m", ignored, "ignored"),
            ("\x1b[33m", skipped, "skipped"),
            ("\x1b[37m", dry_run, "dry-run"),
            ("\x1b[35m", conflict, "conflict"),
            ("\x1b[31m", failed, "failed"),
        ]
        .map(|(color, n, label)| format!("{color}{n} {label}\x1b[0m"))
        .join(", ");
        self.info(&format!("{} targets: {counts}", targets.len()));

        if let Some(path) = self.log_path() {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run, conflict);

    fn record_target(&self, name: &str, status: TargetStatus, message: Option<&str>) {
        self.record_target(name, status, message);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::isolated_logger;
    use std::fs;

    #[test]
    fn logger_new() {
        let (log, _tmp, _guard) = isolated_logger();
        assert!(log.entries().is_empty(), "expected empty target list");
    }

    #[test]
    fn record_target_with_message() {
        let (log, _tmp, _guard) = isolated_logger();
        log.record_target("git/gitconfig", TargetStatus::Skipped, Some("already installed"));
        let entries = log.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "git/gitconfig");
        assert_eq!(entries[0].message.as_deref(), Some("already installed"));
    }

    #[test]
    fn failure_count_only_counts_failed() {
        let (log, _tmp, _guard) = isolated_logger();
        assert_eq!(log.failure_count(), 0);
        log.record_target("a", TargetStatus::Ok, None);
        log.record_target("b", TargetStatus::Failed, Some("cycle"));
        log.record_target("c", TargetStatus::Conflict, Some("regular file"));
        log.record_target("d", TargetStatus::Failed, Some("cycle"));
        assert_eq!(log.failure_count(), 2);
    }

    #[test]
    fn log_trait_delegates_to_logger() {
        let (log, _tmp, _guard) = isolated_logger();
        let log_ref: &dyn Log = &log;
        log_ref.record_target("via-trait", TargetStatus::Ok, None);
        assert_eq!(log.entries().len(), 1);
    }

    #[test]
    fn debug_always_written_to_file() {
        let (log, _tmp, _guard) = isolated_logger();
        let marker = format!("debug-marker-{}", std::process::id());
        log.debug(&marker);
        let path = log.log_path().expect("log path should exist");
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains(&format!("[debug] {marker}")), "{contents}");
    }

    #[test]
    fn levels_are_tagged_in_file() {
        let (log, _tmp, _guard) = isolated_logger();
        log.stage("stage-line");
        log.warn("warn-line");
        log.error("error-line");
        log.dry_run("dry-line");
        log.conflict("conflict-line");
        let contents = fs::read_to_string(log.log_path().expect("log path")).unwrap();
        assert!(contents.contains("==> stage-line"), "{contents}");
        assert!(contents.contains("[warn] warn-line"), "{contents}");
        assert!(contents.contains("[error] error-line"), "{contents}");
        assert!(contents.contains("[dry run] dry-line"), "{contents}");
        assert!(contents.contains("[conflict] conflict-line"), "{contents}");
    }

    #[test]
    fn summary_strips_ansi_in_file() {
        let (log, _tmp, _guard) = isolated_logger();
        log.record_target("git/gitconfig", TargetStatus::Ok, None);
        log.record_target("vim/vimrc", TargetStatus::Conflict, Some("regular file"));
        log.print_summary();
        let contents = fs::read_to_string(log.log_path().expect("log path")).unwrap();
        assert!(contents.contains("✓ git/gitconfig"), "{contents}");
        assert!(contents.contains("! vim/vimrc (regular file)"), "{contents}");
        let totals = "2 targets: 1 ok, 0 ignored, 0 skipped, 0 dry-run, 1 conflict, 0 failed";
        assert!(contents.contains(totals), "{contents}");
        assert!(!contents.contains('\x1b'));
    }
}
