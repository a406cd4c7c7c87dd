//! Command: generate shell completion scripts.
use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::Cli;

/// Write the completion script for `shell` to stdout.
pub fn run(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn bash_script_mentions_every_subcommand() {
        let mut cmd = Cli::command();
        let mut out = Vec::new();
        clap_complete::generate(Shell::Bash, &mut cmd, "dotlink", &mut out);
        let script = String::from_utf8(out).unwrap();
        for sub in ["install", "uninstall", "status", "version", "completions"] {
            assert!(script.contains(sub), "missing {sub}");
        }
    }
}
