//! Install command implementation.
use anyhow::Result;

use crate::cli::TargetOpts;
use crate::context::Context;
use crate::engine::Operation;
use crate::logging::Logger;

/// Run the install command.
///
/// # Errors
///
/// Returns an error if a config file is invalid, a filesystem
/// mutation fails, or any target recorded a failure.
pub fn run(ctx: &Context, opts: &TargetOpts, log: &Logger) -> Result<()> {
    log.stage("Installing");
    super::run_to_completion(ctx, Operation::Install, &opts.targets, log)
}
