//! List command for golden-master suites

use crate::{
    cli::OutputFormat,
    error::CliResult,
    utils::{line_count, modified_at, truncate_text, ColoredOutput},
};
use approvals_core::{FsStore, GoldenMaster, SuiteStatus};
use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::debug;

/// One row of `list` / `status` output
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub suite: String,
    pub status: SuiteStatus,
    pub received_lines: Option<usize>,
    pub approved_lines: Option<usize>,
    pub received_at: Option<DateTime<Local>>,
}

impl SuiteReport {
    pub fn collect(golden: &GoldenMaster<FsStore>, suite: &str) -> CliResult<Self> {
        let status = golden.status(suite)?;
        let received = golden.read_received(suite)?;
        let approved = golden.read_approved(suite)?;
        let received_path = golden.store().dir().join(golden.received_key(suite));

        Ok(Self {
            suite: suite.to_string(),
            status,
            received_lines: received.as_deref().map(line_count),
            approved_lines: approved.as_deref().map(line_count),
            received_at: modified_at(&received_path),
        })
    }
}

pub struct ListCommand;

impl ListCommand {
    pub fn run(golden: &GoldenMaster<FsStore>, format: OutputFormat) -> CliResult<()> {
        let reports = Self::collect(golden)?;
        Self::display(&reports, format)
    }

    /// Reports for every suite in the golden-master directory
    pub fn collect(golden: &GoldenMaster<FsStore>) -> CliResult<Vec<SuiteReport>> {
        debug!("Listing suites in {}", golden.store().dir().display());
        golden
            .suites()?
            .iter()
            .map(|suite| SuiteReport::collect(golden, suite))
            .collect()
    }

    pub fn display(reports: &[SuiteReport], format: OutputFormat) -> CliResult<()> {
        match format {
            OutputFormat::Table => Self::display_table(reports),
            _ => {
                let json_data = serde_json::to_value(reports)?;
                println!("{}", format.format_json(&json_data)?);
            }
        }
        Ok(())
    }

    fn display_table(reports: &[SuiteReport]) {
        if reports.is_empty() {
            println!("{}", ColoredOutput::info("No suites found"));
            return;
        }

        println!(
            "{}",
            ColoredOutput::success(&format!("Found {} suite(s):", reports.len()))
        );
        println!();

        println!(
            "{:<32} {:<18} {:<10} {:<10} {:<16}",
            ColoredOutput::highlight("Suite"),
            ColoredOutput::highlight("Status"),
            ColoredOutput::highlight("Received"),
            ColoredOutput::highlight("Approved"),
            ColoredOutput::highlight("Last run")
        );
        println!("{}", "-".repeat(90));

        for report in reports {
            let count = |lines: Option<usize>| {
                lines.map_or_else(|| "-".to_string(), |n| n.to_string())
            };
            let last_run = report
                .received_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string());

            println!(
                "{:<32} {:<18} {:<10} {:<10} {:<16}",
                truncate_text(&report.suite, 32),
                status_label(report.status),
                count(report.received_lines),
                count(report.approved_lines),
                ColoredOutput::dim(&last_run)
            );
        }
    }
}

pub(crate) fn status_label(status: SuiteStatus) -> colored::ColoredString {
    let padded = format!("{:<18}", status.as_str());
    match status {
        SuiteStatus::Approved => ColoredOutput::success(&padded),
        SuiteStatus::Pending => ColoredOutput::warning(&padded),
        SuiteStatus::Mismatch => ColoredOutput::error(&padded),
        SuiteStatus::MissingReceived | SuiteStatus::MissingApproved => ColoredOutput::dim(&padded),
    }
}
