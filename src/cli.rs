//! Command-line interface definition.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point.
#[derive(Parser, Debug)]
#[command(
    name = "dotbrew",
    about = "Install Homebrew taps, formulae, casks and bundles from a dotfiles repository",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Configuration file (default: brew.toml in the base directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory `brew` runs in (default: current directory)
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run every configured directive
    Install(InstallOpts),
    /// List directives supported on this platform
    Directives,
    /// Print version information
    Version,
}

impl Command {
    /// Subcommand name, used to name the log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Install(_) => "install",
            Self::Directives => "directives",
            Self::Version => "version",
        }
    }
}

/// Options for the `install` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct InstallOpts {
    /// Skip blocks for these directives
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<String>,

    /// Run only blocks for these directives
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,
}

impl InstallOpts {
    /// Whether blocks for `directive` should run.
    #[must_use]
    pub fn selects(&self, directive: &str) -> bool {
        if self.skip.iter().any(|s| s == directive) {
            return false;
        }
        self.only.is_empty() || self.only.iter().any(|s| s == directive)
    }
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
    fn parse_install_dry_run() {
        let cli = Cli::parse_from(["dotbrew", "--dry-run", "install"]);
        assert!(cli.global.dry_run);
    }

    #[test]
    fn parse_install_dry_run_short() {
        let cli = Cli::parse_from(["dotbrew", "-d", "install"]);
        assert!(cli.global.dry_run);
    }

    #[test]
    fn parse_install_skip() {
        let cli = Cli::parse_from(["dotbrew", "install", "--skip", "cask,brewfile"]);
        let Command::Install(opts) = cli.command else {
            panic!("expected install");
        };
        assert_eq!(opts.skip, vec!["cask", "brewfile"]);
    }

    #[test]
    fn parse_install_only() {
        let cli = Cli::parse_from(["dotbrew", "install", "--only", "tap"]);
        let Command::Install(opts) = cli.command else {
            panic!("expected install");
        };
        assert_eq!(opts.only, vec!["tap"]);
    }

    #[test]
    fn parse_config_and_base_dir() {
        let cli = Cli::parse_from([
            "dotbrew",
            "--config",
            "/dots/macos.toml",
            "--base-dir",
            "/dots",
            "install",
        ]);
        assert_eq!(cli.global.config, Some(PathBuf::from("/dots/macos.toml")));
        assert_eq!(cli.global.base_dir, Some(PathBuf::from("/dots")));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["dotbrew", "install", "-v", "-c", "brew.toml"]);
        assert!(cli.verbose);
        assert_eq!(cli.global.config, Some(PathBuf::from("brew.toml")));
    }

    #[test]
    fn parse_directives_and_version() {
        let cli = Cli::parse_from(["dotbrew", "directives"]);
        assert!(matches!(cli.command, Command::Directives));
        assert_eq!(cli.command.name(), "directives");
        let cli = Cli::parse_from(["dotbrew", "version"]);
        assert!(matches!(cli.command, Command::Version));
    }

    #[test]
    fn selects_honours_only_and_skip() {
        let all = InstallOpts::default();
        assert!(all.selects("brew"));

        let only = InstallOpts {
            only: vec!["tap".to_string(), "brew".to_string()],
            ..InstallOpts::default()
        };
        assert!(only.selects("tap"));
        assert!(!only.selects("cask"));

        let skip = InstallOpts {
            skip: vec!["cask".to_string()],
            only: vec!["cask".to_string()],
        };
        assert!(!skip.selects("cask"));
    }
}
