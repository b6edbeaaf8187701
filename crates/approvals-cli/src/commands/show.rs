//! Show command: print both artifacts of a suite

use crate::{
    cli::OutputFormat,
    error::{CliError, CliResult},
    utils::ColoredOutput,
};
use approvals_core::{FsStore, GoldenMaster};
use serde_json::json;

pub struct ShowCommand;

impl ShowCommand {
    pub fn run(golden: &GoldenMaster<FsStore>, suite: &str, format: OutputFormat) -> CliResult<()> {
        let received = golden.read_received(suite)?;
        let approved = golden.read_approved(suite)?;
        if received.is_none() && approved.is_none() {
            return Err(CliError::SuiteNotFound(suite.to_string()));
        }
        let status = golden.status(suite)?;

        match format {
            OutputFormat::Table => {
                println!(
                    "{} {} ({})",
                    ColoredOutput::highlight("Suite:"),
                    suite,
                    status
                );
                Self::print_section("received", received.as_deref());
                Self::print_section("approved", approved.as_deref());
            }
            _ => {
                let data = json!({
                    "suite": suite,
                    "status": status,
                    "received": received,
                    "approved": approved,
                });
                println!("{}", format.format_json(&data)?);
            }
        }
        Ok(())
    }

    fn print_section(label: &str, text: Option<&str>) {
        println!();
        println!("{}", ColoredOutput::highlight(&format!("--- {} ---", label)));
        match text {
            Some("") => println!("{}", ColoredOutput::dim("(empty)")),
            Some(text) => println!("{}", text),
            None => println!("{}", ColoredOutput::dim("(missing)")),
        }
    }
}
