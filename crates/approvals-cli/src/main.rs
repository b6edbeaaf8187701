//! approvals CLI main entry point

use approvals_cli::{
    cli::{Cli, Commands},
    commands::{ApproveCommand, ListCommand, ShowCommand, StatusCommand},
    error::CliResult,
    utils::{init_tracing, ColoredOutput},
};
use approvals_core::GoldenMaster;
use clap::Parser;
use tracing::debug;

fn main() {
    let exit_code = match run() {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{} {}", ColoredOutput::error("Error:"), e);
            1
        }
    };

    std::process::exit(exit_code);
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose)?;

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = cli.approval_config()?;
    config.validate()?;
    debug!("Golden-master directory: {}", config.golden_dir().display());
    let golden = GoldenMaster::from_config(&config);

    match &cli.command {
        Commands::List => ListCommand::run(&golden, cli.format),
        Commands::Status { suites } => StatusCommand::run(&golden, suites, cli.format),
        Commands::Approve {
            suites,
            all,
            dry_run,
        } => ApproveCommand::run(&golden, suites, *all, *dry_run),
        Commands::Show { suite } => ShowCommand::run(&golden, suite, cli.format),
    }
}
