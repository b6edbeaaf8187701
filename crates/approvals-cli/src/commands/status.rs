//! Status command: fail unless every selected suite is approved

use crate::{
    cli::OutputFormat,
    commands::list::{status_label, ListCommand, SuiteReport},
    error::{CliError, CliResult},
    utils::ColoredOutput,
};
use approvals_core::{FsStore, GoldenMaster, SuiteStatus};

pub struct StatusCommand;

impl StatusCommand {
    pub fn run(
        golden: &GoldenMaster<FsStore>,
        suites: &[String],
        format: OutputFormat,
    ) -> CliResult<()> {
        let reports = Self::collect(golden, suites)?;
        let pending = Self::unapproved(&reports);

        match format {
            OutputFormat::Table => {
                for report in &reports {
                    println!("{} {}", status_label(report.status), report.suite);
                }
                if pending == 0 {
                    println!("{}", ColoredOutput::success("All suites approved"));
                }
            }
            _ => ListCommand::display(&reports, format)?,
        }

        if pending > 0 {
            return Err(CliError::NotApproved(pending));
        }
        Ok(())
    }

    pub fn collect(golden: &GoldenMaster<FsStore>, suites: &[String]) -> CliResult<Vec<SuiteReport>> {
        if suites.is_empty() {
            return ListCommand::collect(golden);
        }

        let known = golden.suites()?;
        suites
            .iter()
            .map(|suite| {
                if !known.contains(suite) {
                    return Err(CliError::SuiteNotFound(suite.clone()));
                }
                SuiteReport::collect(golden, suite)
            })
            .collect()
    }

    pub fn unapproved(reports: &[SuiteReport]) -> usize {
        reports
            .iter()
            .filter(|r| r.status != SuiteStatus::Approved)
            .count()
    }
}
