//! Core logging types: target entries, status, and the [`Log`] trait.

/// Per-target result for summary reporting.
#[derive(Debug, Clone)]
pub struct TargetEntry {
    /// Target path as shown to the user.
    pub name: String,
    /// Final status of the target.
    pub status: TargetStatus,
    /// Optional detail message (e.g., skip reason or conflict description).
    pub message: Option<String>,
}

/// Status of a processed target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetStatus {
    /// The command did what was asked (or status found it installed).
    Ok,
    /// Listed under `[ignore]`; nothing was done.
    Ignored,
    /// Nothing to do: missing target, no directive, already installed or
    /// not installed.
    Skipped,
    /// Dry-run mode; the action was only reported.
    DryRun,
    /// The destination exists but is not what the directive would create.
    Conflict,
    /// The target could not be processed (e.g., a directory cycle).
    Failed,
}

/// Abstraction over logging backends.
///
/// Engine and command code log through this trait so tests can capture
/// output without a global subscriber.  [`Logger`](super::logger::Logger)
/// is the production implementation.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (shown on the console only when verbose).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Log a destination that holds something unexpected.
    fn conflict(&self, msg: &str);
    /// Record a target result for the summary.
    fn record_target(&self, name: &str, status: TargetStatus, message: Option<&str>);
}
