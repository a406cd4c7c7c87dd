//! Apply one command to one resolved target.
use std::fmt;
use std::sync::Arc;

use anyhow::Result;

use super::resolve::ResolvedAction;
use crate::context::Context;
use crate::operations::EntryKind;
use crate::resources::{self, ResourceState};

/// The three user-facing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Create destinations.
    Install,
    /// Remove destinations.
    Uninstall,
    /// Report on destinations without changing anything.
    Status,
}

impl Operation {
    /// Lower-case command name, also used for the log file name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Uninstall => "uninstall",
            Self::Status => "status",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to a resolved target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The destination was created.
    Installed,
    /// The destination was removed.
    Removed,
    /// Install skipped: something already exists at the destination.
    AlreadyInstalled,
    /// Uninstall skipped: nothing exists at the destination.
    NotInstalled,
    /// The target is listed under `[ignore]`.
    Ignored,
    /// Dry-run: the destination would have been created.
    WouldInstall,
    /// Dry-run: the destination would have been removed.
    WouldRemove,
    /// Status: the destination matches the directive.
    StatusInstalled,
    /// Status: nothing exists at the destination.
    StatusMissing,
    /// Status: something else occupies the destination.
    StatusConflict {
        /// What was found instead.
        reason: String,
    },
}

/// Whether an entry of `kind` at the destination prevents install.
///
/// Any entry blocks, including a dangling symlink or one of the wrong type;
/// the contents are never compared.  This is what makes a repeated install
/// a no-op.
#[must_use]
pub const fn blocks_install(kind: EntryKind) -> bool {
    !matches!(kind, EntryKind::Missing)
}

/// Carry out `operation` for `action`.
///
/// Under dry-run nothing is mutated; the would-be outcome is returned.
/// Successful mutations are noted at debug level.
///
/// # Errors
///
/// Returns an error if creating, removing or inspecting the destination
/// fails.  These are not retried.
pub fn execute(ctx: &Context, operation: Operation, action: &ResolvedAction) -> Result<Outcome> {
    let Some(resource) = resources::for_directive(
        action.directive,
        action.source.clone(),
        action.destination.clone(),
        Arc::clone(&ctx.fs_ops),
    ) else {
        return Ok(Outcome::Ignored);
    };

    let kind = ctx.fs_ops.entry_kind(&action.destination);
    let outcome = match operation {
        Operation::Install if blocks_install(kind) => Outcome::AlreadyInstalled,
        Operation::Install if ctx.dry_run => Outcome::WouldInstall,
        Operation::Install => {
            resource.apply()?;
            ctx.log.debug(&format!("created {}", resource.description()));
            Outcome::Installed
        }
        Operation::Uninstall if kind == EntryKind::Missing => Outcome::NotInstalled,
        Operation::Uninstall if ctx.dry_run => Outcome::WouldRemove,
        Operation::Uninstall => {
            resource.remove()?;
            ctx.log.debug(&format!("removed {}", resource.description()));
            Outcome::Removed
        }
        Operation::Status => match resource.current_state()? {
            ResourceState::Missing => Outcome::StatusMissing,
            ResourceState::Correct => Outcome::StatusInstalled,
            ResourceState::Incorrect { current } => Outcome::StatusConflict { reason: current },
        },
    };
    Ok(outcome)
}
