use approvals_core::testing::init_test_logger;
use approvals_core::{ApprovalConfig, Approvals};
use std::path::Path;

/// Approvals rooted at `root`, storing artifacts in `root/golden-master`.
pub fn approvals_in(root: &Path) -> Approvals {
    init_test_logger();
    Approvals::new(&ApprovalConfig::new(root)).expect("default config is valid")
}
