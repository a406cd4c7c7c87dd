use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the dotfile installer.
#[derive(Parser, Debug)]
#[command(
    name = "dotlink",
    about = "Link, copy or skip dotfiles into place, driven by per-directory dotlink.conf files",
    version = crate::VERSION
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Preview changes without applying (implies --verbose)
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Working root that relative targets are resolved against
    /// [default: $DOTLINK_ROOT, else the current directory]
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the destinations for the given targets
    Install(TargetOpts),
    /// Remove the destinations for the given targets
    Uninstall(TargetOpts),
    /// Report whether each target's destination is in place
    Status(TargetOpts),
    /// Print version information
    Version,
    /// Generate shell completions
    Completions(CompletionsOpts),
}

impl Command {
    /// Name used for the log file of this run.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Install(_) => "install",
            Self::Uninstall(_) => "uninstall",
            Self::Status(_) => "status",
            Self::Version => "version",
            Self::Completions(_) => "completions",
        }
    }
}

/// Targets for `install`, `uninstall` and `status`.
#[derive(Parser, Debug, Clone)]
pub struct TargetOpts {
    /// Files or directories inside the dotfiles tree
    #[arg(required = true, value_name = "TARGETS")]
    pub targets: Vec<PathBuf>,
}

/// Options for the `completions` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CompletionsOpts {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
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
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_install_targets() {
        let cli = Cli::parse_from(["dotlink", "install", "git", "vim/vimrc"]);
        let Command::Install(opts) = cli.command else {
            panic!("expected install");
        };
        assert_eq!(
            opts.targets,
            [PathBuf::from("git"), PathBuf::from("vim/vimrc")]
        );
    }

    #[test]
    fn targets_are_required() {
        for cmd in ["install", "uninstall", "status"] {
            let err = Cli::try_parse_from(["dotlink", cmd]).unwrap_err();
            assert_eq!(
                err.kind(),
                clap::error::ErrorKind::MissingRequiredArgument,
                "{cmd}"
            );
        }
    }

    #[test]
    fn missing_command_is_an_error() {
        assert!(Cli::try_parse_from(["dotlink"]).is_err());
    }

    #[test]
    fn unknown_option_is_an_error() {
        let err = Cli::try_parse_from(["dotlink", "--force", "install", "git"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn parse_dry_run_short_after_subcommand() {
        let cli = Cli::parse_from(["dotlink", "install", "-d", "git"]);
        assert!(cli.global.dry_run);
    }

    #[test]
    fn parse_dry_run_long() {
        let cli = Cli::parse_from(["dotlink", "--dry-run", "uninstall", "git"]);
        assert!(cli.global.dry_run);
        assert!(matches!(cli.command, Command::Uninstall(_)));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::parse_from(["dotlink", "-v", "status", "git"]);
        assert!(cli.verbose);
        assert!(!cli.global.dry_run);
    }

    #[test]
    fn parse_root_override() {
        let cli = Cli::parse_from(["dotlink", "--root", "/tmp/dotfiles", "status", "git"]);
        assert_eq!(cli.global.root, Some(PathBuf::from("/tmp/dotfiles")));
    }

    #[test]
    fn parse_version() {
        let cli = Cli::parse_from(["dotlink", "version"]);
        assert!(matches!(cli.command, Command::Version));
        assert_eq!(cli.command.name(), "version");
    }

    #[test]
    fn parse_completions() {
        let cli = Cli::parse_from(["dotlink", "completions", "zsh"]);
        let Command::Completions(opts) = cli.command else {
            panic!("expected completions");
        };
        assert_eq!(opts.shell, clap_complete::Shell::Zsh);
    }
}
