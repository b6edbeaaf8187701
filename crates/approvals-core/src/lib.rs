//! Approval testing by combination.
//!
//! A run drives a function under test through every combination of a
//! parameter matrix, records a textual trace of spy calls and return values,
//! and compares that trace against an approved golden master on disk.
//!
//! ```no_run
//! use approvals_core::{ApprovalConfig, Approvals};
//! use serde_json::json;
//!
//! let approvals = Approvals::new(&ApprovalConfig::for_manifest_dir(env!("CARGO_MANIFEST_DIR")))?;
//! let run = approvals.run("Sum")?;
//! let audit = run.spy("audit");
//!
//! run.approve_combinations(
//!     |args| {
//!         audit.call(args);
//!         args[0].as_i64().unwrap_or(0) + args[1].as_i64().unwrap_or(0)
//!     },
//!     &[vec![json!(1), json!(2)], vec![json!(10), json!(20)]],
//! )?;
//! # Ok::<(), approvals_core::ApprovalError>(())
//! ```
//!
//! The first run of a suite fails: the approved artifact is created empty.
//! Review `golden-master/Sum.received`, copy it over `Sum.approved` (or run
//! `approvals approve Sum`) and the next run passes.

pub mod combinations;
pub mod config;
pub mod error;
pub mod golden;
pub mod recorder;
pub mod run;
pub mod spy;
pub mod store;
pub mod testing;

// Re-export commonly used types
pub use config::ApprovalConfig;
pub use error::{ApprovalError, ApprovalResult, ApprovedState};
pub use golden::{GoldenMaster, SuiteStatus};
pub use recorder::Recorder;
pub use run::{ApprovalRun, Approvals};
pub use spy::{Spy, SpyReturn};
pub use store::{FsStore, GoldenStore, MemoryStore};
