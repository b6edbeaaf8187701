//! CLI argument definitions using clap

use approvals_core::{ApprovalConfig, ApprovalResult};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value as JsonValue;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "approvals",
    about = "Inspect and approve golden-master artifacts",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory containing the golden-master directory
    #[arg(long, env = "APPROVALS_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Name of the golden-master directory under the root
    #[arg(long, env = "APPROVALS_DIR", default_value = "golden-master")]
    pub dir: String,

    /// Configuration file (TOML or YAML); overrides --root and --dir
    #[arg(long, env = "APPROVALS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose output", global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, help = "Disable colored output", global = true)]
    pub no_color: bool,
}

impl Cli {
    /// Resolve the approval configuration from the config file or the flags.
    pub fn approval_config(&self) -> ApprovalResult<ApprovalConfig> {
        match &self.config {
            Some(path) => ApprovalConfig::load(path),
            None => Ok(ApprovalConfig::new(&self.root).with_directory(&self.dir)),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every suite in the golden-master directory
    List,

    /// Show suite status; exits non-zero unless every suite is approved
    Status {
        /// Suites to check (default: all)
        suites: Vec<String>,
    },

    /// Accept received output as the new golden master
    Approve {
        /// Suites to approve
        #[arg(required_unless_present = "all")]
        suites: Vec<String>,

        /// Approve every suite whose received output is not yet approved
        #[arg(long, conflicts_with = "suites")]
        all: bool,

        /// Show what would be approved without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the received and approved output of a suite
    Show {
        /// Suite name
        suite: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    Table,
    /// Pretty-printed JSON
    Pretty,
    /// Compact JSON
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Format a JSON value according to the output format
    pub fn format_json(&self, value: &JsonValue) -> Result<String, serde_json::Error> {
        match self {
            // Commands render their own tables; this is the fallback
            Self::Table | Self::Pretty => serde_json::to_string_pretty(value),
            Self::Json => serde_json::to_string(value),
            Self::Yaml => serde_yaml::to_string(value).map_err(|e| {
                serde_json::Error::io(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("YAML serialization error: {}", e),
                ))
            }),
        }
    }
}
