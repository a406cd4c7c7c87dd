//! Uninstall command implementation.
use anyhow::Result;

use crate::cli::TargetOpts;
use crate::context::Context;
use crate::engine::Operation;
use crate::logging::Logger;

/// Run the uninstall command.
///
/// Destinations are removed whatever they currently are; a directory left by
/// a `copy` directive is removed recursively.
///
/// # Errors
///
/// Returns an error if a config file is invalid, a removal
/// fails, or any target recorded a failure.
pub fn run(ctx: &Context, opts: &TargetOpts, log: &Logger) -> Result<()> {
    log.stage("Uninstalling");
    super::run_to_completion(ctx, Operation::Uninstall, &opts.targets, log)
}
