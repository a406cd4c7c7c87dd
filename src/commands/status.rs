//! Status command implementation.
use anyhow::Result;

use crate::cli::TargetOpts;
use crate::context::Context;
use crate::engine::Operation;
use crate::logging::Logger;

/// Run the status command.  Read-only, including without `--dry-run`.
///
/// # Errors
///
/// Returns an error if a config file is invalid or a destination cannot be
/// inspected.
pub fn run(ctx: &Context, opts: &TargetOpts, log: &Logger) -> Result<()> {
    log.stage("Checking status");
    super::run_to_completion(ctx, Operation::Status, &opts.targets, log)
}
