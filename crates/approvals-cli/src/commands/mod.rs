pub mod approve;
pub mod list;
pub mod show;
pub mod status;

// Re-export command handlers
pub use approve::ApproveCommand;
pub use list::{ListCommand, SuiteReport};
pub use show::ShowCommand;
pub use status::StatusCommand;
