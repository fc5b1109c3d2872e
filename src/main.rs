//! `dotbrew` command-line entry point.
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use dotbrew::cli::{Cli, Command};
use dotbrew::commands;
use dotbrew::logging::{Logger, init_subscriber};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    let command = args.command.name();
    init_subscriber(args.verbose, command);

    match args.command {
        Command::Install(opts) => {
            let platform = commands::detect_platform()?;
            let log = Arc::new(Logger::new(command));
            commands::install::run(&args.global, &opts, platform, &log)
        }
        Command::Directives => {
            let platform = commands::detect_platform()?;
            commands::directives::run(&platform);
            Ok(())
        }
        Command::Version => {
            commands::version::run();
            Ok(())
        }
    }
}
