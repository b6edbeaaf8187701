//! Approve command: promote received output to the golden master

use crate::{
    commands::ListCommand,
    error::{CliError, CliResult},
    utils::ColoredOutput,
};
use approvals_core::{FsStore, GoldenMaster, SuiteStatus};
use tracing::info;

pub struct ApproveCommand;

impl ApproveCommand {
    pub fn run(
        golden: &GoldenMaster<FsStore>,
        suites: &[String],
        all: bool,
        dry_run: bool,
    ) -> CliResult<()> {
        let targets = Self::targets(golden, suites, all)?;

        if targets.is_empty() {
            println!("{}", ColoredOutput::info("Nothing to approve"));
            return Ok(());
        }

        for suite in &targets {
            if dry_run {
                println!("{} {}", ColoredOutput::dim("would approve"), suite);
                continue;
            }
            golden.approve(suite)?;
            println!("{} {}", ColoredOutput::success("approved"), suite);
        }

        if !dry_run {
            info!("Approved {} suite(s)", targets.len());
        }
        Ok(())
    }

    /// Suites the command would write, in order
    pub fn targets(
        golden: &GoldenMaster<FsStore>,
        suites: &[String],
        all: bool,
    ) -> CliResult<Vec<String>> {
        if all {
            let reports = ListCommand::collect(golden)?;
            return Ok(reports
                .into_iter()
                .filter(|r| {
                    matches!(
                        r.status,
                        SuiteStatus::Pending | SuiteStatus::Mismatch | SuiteStatus::MissingApproved
                    )
                })
                .map(|r| r.suite)
                .collect());
        }

        if suites.is_empty() {
            return Err(CliError::InvalidArgument(
                "name at least one suite or pass --all".to_string(),
            ));
        }

        for suite in suites {
            if golden.read_received(suite)?.is_none() {
                return Err(CliError::SuiteNotFound(format!(
                    "{} (no received output at {})",
                    suite,
                    golden.store().dir().join(golden.received_key(suite)).display()
                )));
            }
        }
        Ok(suites.to_vec())
    }
}
