//! CLI argument definitions.
//!
//! The provisioner takes no positional arguments; every flag only adjusts
//! output, logging or where settings come from.

use clap::Parser;
use std::path::PathBuf;

use crate::ui::OutputMode;

/// Provision PHP, Composer and taknone/liveproto on this machine.
#[derive(Debug, Parser)]
#[command(name = "liveproto-setup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a settings file (overrides ~/.config/liveproto-setup/config.yml)
    #[arg(short, long, env = "LIVEPROTO_SETUP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Stream package manager and Composer output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Output mode selected by `--verbose`/`--quiet`.
    pub fn output_mode(&self) -> OutputMode {
        if self.quiet {
            OutputMode::Quiet
        } else if self.verbose {
            OutputMode::Verbose
        } else {
            OutputMode::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_arguments_is_normal_mode() {
        let cli = Cli::try_parse_from(["liveproto-setup"]).unwrap();
        assert_eq!(cli.output_mode(), OutputMode::Normal);
        assert!(!cli.debug);
    }

    #[test]
    fn verbose_and_quiet_modes() {
        let cli = Cli::try_parse_from(["liveproto-setup", "--verbose"]).unwrap();
        assert_eq!(cli.output_mode(), OutputMode::Verbose);

        let cli = Cli::try_parse_from(["liveproto-setup", "-q"]).unwrap();
        assert_eq!(cli.output_mode(), OutputMode::Quiet);
    }

    #[test]
    fn verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["liveproto-setup", "-v", "-q"]).is_err());
    }

    #[test]
    fn config_flag_takes_path() {
        let cli = Cli::try_parse_from(["liveproto-setup", "--config", "/tmp/setup.yml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/setup.yml")));
    }

    #[test]
    fn positional_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["liveproto-setup", "extra"]).is_err());
    }
}
