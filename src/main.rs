use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use dotlink::cli::{Cli, Command};
use dotlink::{commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    match &args.command {
        Command::Version => {
            commands::version::run();
            return Ok(());
        }
        Command::Completions(opts) => {
            commands::completions::run(opts.shell);
            return Ok(());
        }
        Command::Install(_) | Command::Uninstall(_) | Command::Status(_) => {}
    }

    let name = args.command.name();
    let log = Arc::new(logging::Logger::new(name));
    let ctx = commands::setup(&args.global, args.verbose, &log)?;
    logging::init_subscriber(ctx.verbose, name);

    match &args.command {
        Command::Install(opts) => commands::install::run(&ctx, opts, &log),
        Command::Uninstall(opts) => commands::uninstall::run(&ctx, opts, &log),
        Command::Status(opts) => commands::status::run(&ctx, opts, &log),
        Command::Version | Command::Completions(_) => Ok(()),
    }
}
