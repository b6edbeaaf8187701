//! Golden-master persistence and comparison.
//!
//! Every suite owns two artifacts in the store: `{suite}.received`, the trace
//! of the most recent run (always overwritten), and `{suite}.approved`, the
//! accepted reference. The approved artifact is created empty the first time
//! a suite runs and is otherwise only written by an explicit [`GoldenMaster::approve`].

use crate::config::{ApprovalConfig, DEFAULT_APPROVED_EXTENSION, DEFAULT_RECEIVED_EXTENSION};
use crate::error::{ApprovalError, ApprovalResult, ApprovedState};
use crate::store::{FsStore, GoldenStore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, info, warn};

/// Comparison state of one suite, computed without writing anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuiteStatus {
    /// Received and approved are identical.
    Approved,
    /// Approved exists but is empty; nothing was accepted yet.
    Pending,
    /// Approved has content that differs from received.
    Mismatch,
    MissingReceived,
    MissingApproved,
}

impl SuiteStatus {
    pub fn is_approved(&self) -> bool {
        matches!(self, SuiteStatus::Approved)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SuiteStatus::Approved => "approved",
            SuiteStatus::Pending => "pending",
            SuiteStatus::Mismatch => "mismatch",
            SuiteStatus::MissingReceived => "missing_received",
            SuiteStatus::MissingApproved => "missing_approved",
        }
    }
}

impl fmt::Display for SuiteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reject names that would escape the golden-master directory.
pub fn validate_suite_name(suite: &str) -> ApprovalResult<()> {
    if suite.is_empty()
        || suite == "."
        || suite == ".."
        || suite.contains('/')
        || suite.contains('\\')
        || suite.contains('\0')
    {
        return Err(ApprovalError::InvalidSuiteName(suite.to_string()));
    }
    Ok(())
}

/// Golden-master protocol over a [`GoldenStore`].
#[derive(Debug)]
pub struct GoldenMaster<S: GoldenStore> {
    store: S,
    received_extension: String,
    approved_extension: String,
}

impl GoldenMaster<FsStore> {
    pub fn from_config(config: &ApprovalConfig) -> Self {
        Self::new(config.store()).with_extensions(
            config.received_extension.clone(),
            config.approved_extension.clone(),
        )
    }
}

impl<S: GoldenStore> GoldenMaster<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            received_extension: DEFAULT_RECEIVED_EXTENSION.to_string(),
            approved_extension: DEFAULT_APPROVED_EXTENSION.to_string(),
        }
    }

    pub fn with_extensions(
        mut self,
        received: impl Into<String>,
        approved: impl Into<String>,
    ) -> Self {
        self.received_extension = received.into();
        self.approved_extension = approved.into();
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn received_key(&self, suite: &str) -> String {
        format!("{}.{}", suite, self.received_extension)
    }

    pub fn approved_key(&self, suite: &str) -> String {
        format!("{}.{}", suite, self.approved_extension)
    }

    /// Persist a run's trace and compare it against the approved reference.
    pub fn persist_and_compare(&self, suite: &str, lines: &[String]) -> ApprovalResult<()> {
        validate_suite_name(suite)?;
        let received_key = self.received_key(suite);
        let approved_key = self.approved_key(suite);

        self.store.ensure_ready()?;
        self.store.write(&received_key, &lines.join("\n"))?;

        if !self.store.exists(&approved_key)? {
            debug!(suite, "no approved artifact yet, creating an empty one");
            self.store.write(&approved_key, "")?;
        }

        let received = self.store.read(&received_key)?;
        let approved = self.store.read(&approved_key)?;

        if received == approved {
            info!(suite, lines = lines.len(), "received output matches golden master");
            return Ok(());
        }

        let state = ApprovedState::of(&approved);
        warn!(suite, ?state, "received output does not match golden master");
        Err(ApprovalError::Mismatch {
            suite: suite.to_string(),
            state,
            received: self.store.location(&received_key),
            approved: self.store.location(&approved_key),
        })
    }

    /// Write whatever a run recorded before it was cut short. No comparison.
    pub fn flush_received(&self, suite: &str, lines: &[String]) -> ApprovalResult<()> {
        validate_suite_name(suite)?;
        self.store.ensure_ready()?;
        self.store.write(&self.received_key(suite), &lines.join("\n"))
    }

    pub fn read_received(&self, suite: &str) -> ApprovalResult<Option<String>> {
        validate_suite_name(suite)?;
        self.read_optional(&self.received_key(suite))
    }

    pub fn read_approved(&self, suite: &str) -> ApprovalResult<Option<String>> {
        validate_suite_name(suite)?;
        self.read_optional(&self.approved_key(suite))
    }

    fn read_optional(&self, key: &str) -> ApprovalResult<Option<String>> {
        if self.store.exists(key)? {
            self.store.read(key).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn status(&self, suite: &str) -> ApprovalResult<SuiteStatus> {
        validate_suite_name(suite)?;
        let Some(received) = self.read_received(suite)? else {
            return Ok(SuiteStatus::MissingReceived);
        };
        let Some(approved) = self.read_approved(suite)? else {
            return Ok(SuiteStatus::MissingApproved);
        };

        Ok(if received == approved {
            SuiteStatus::Approved
        } else if approved.is_empty() {
            SuiteStatus::Pending
        } else {
            SuiteStatus::Mismatch
        })
    }

    /// Names of every suite with at least one artifact in the store.
    pub fn suites(&self) -> ApprovalResult<Vec<String>> {
        let received_suffix = format!(".{}", self.received_extension);
        let approved_suffix = format!(".{}", self.approved_extension);

        let suites: BTreeSet<String> = self
            .store
            .keys()?
            .into_iter()
            .filter_map(|key| {
                key.strip_suffix(&received_suffix)
                    .or_else(|| key.strip_suffix(&approved_suffix))
                    .filter(|suite| !suite.is_empty())
                    .map(str::to_string)
            })
            .collect();

        Ok(suites.into_iter().collect())
    }

    /// Accept the received trace as the new reference.
    pub fn approve(&self, suite: &str) -> ApprovalResult<()> {
        validate_suite_name(suite)?;
        let received_key = self.received_key(suite);
        let received = self.store.read(&received_key)?;

        self.store.ensure_ready()?;
        self.store.write(&self.approved_key(suite), &received)?;
        info!(suite, from = %self.store.location(&received_key), "approved received output");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn first_run_creates_empty_approved_and_fails() {
        let golden = GoldenMaster::new(MemoryStore::new());
        let err = golden
            .persist_and_compare("Sum", &lines(&["return value: 11"]))
            .unwrap_err();

        match err {
            ApprovalError::Mismatch { suite, state, received, approved } => {
                assert_eq!(suite, "Sum");
                assert_eq!(state, ApprovedState::Empty);
                assert_eq!(received, "memory://Sum.received");
                assert_eq!(approved, "memory://Sum.approved");
            }
            other => panic!("expected mismatch, got {other:?}"),
        }
        assert_eq!(golden.store().get("Sum.approved").as_deref(), Some(""));
        assert_eq!(
            golden.store().get("Sum.received").as_deref(),
            Some("return value: 11")
        );
        assert_eq!(golden.status("Sum").unwrap(), SuiteStatus::Pending);
    }

    #[test]
    fn matching_approved_passes_and_is_untouched() {
        let store = MemoryStore::new().with_artifact("Sum.approved", "a\nb");
        let golden = GoldenMaster::new(store);

        golden.persist_and_compare("Sum", &lines(&["a", "b"])).unwrap();
        assert_eq!(golden.store().get("Sum.approved").as_deref(), Some("a\nb"));
        assert_eq!(golden.status("Sum").unwrap(), SuiteStatus::Approved);
    }

    #[test]
    fn populated_approved_mismatch_reports_broken_master() {
        let store = MemoryStore::new().with_artifact("Sum.approved", "a\nb");
        let golden = GoldenMaster::new(store);

        let err = golden.persist_and_compare("Sum", &lines(&["a", "c"])).unwrap_err();
        assert!(err.to_string().contains("you may have broken the golden master"));
        assert_eq!(golden.store().get("Sum.approved").as_deref(), Some("a\nb"));
        assert_eq!(golden.status("Sum").unwrap(), SuiteStatus::Mismatch);
    }

    #[test]
    fn trailing_newline_counts_as_a_difference() {
        let store = MemoryStore::new().with_artifact("Sum.approved", "a\n");
        let golden = GoldenMaster::new(store);
        assert!(golden.persist_and_compare("Sum", &lines(&["a"])).is_err());
    }

    #[test]
    fn empty_trace_against_empty_approved_passes() {
        let golden = GoldenMaster::new(MemoryStore::new().with_artifact("Noop.approved", ""));
        golden.persist_and_compare("Noop", &[]).unwrap();
    }

    #[test]
    fn approve_copies_received_over_approved() {
        let golden = GoldenMaster::new(MemoryStore::new());
        assert!(golden.persist_and_compare("Sum", &lines(&["x"])).is_err());

        golden.approve("Sum").unwrap();
        golden.persist_and_compare("Sum", &lines(&["x"])).unwrap();
        assert_eq!(golden.store().get("Sum.approved").as_deref(), Some("x"));
    }

    #[test]
    fn approve_without_received_fails() {
        let golden = GoldenMaster::new(MemoryStore::new());
        assert!(matches!(
            golden.approve("Ghost").unwrap_err(),
            ApprovalError::Io { .. }
        ));
    }

    #[test]
    fn status_reports_missing_artifacts() {
        let store = MemoryStore::new()
            .with_artifact("OnlyReceived.received", "x")
            .with_artifact("OnlyApproved.approved", "x");
        let golden = GoldenMaster::new(store);

        assert_eq!(golden.status("OnlyReceived").unwrap(), SuiteStatus::MissingApproved);
        assert_eq!(golden.status("OnlyApproved").unwrap(), SuiteStatus::MissingReceived);
        assert_eq!(golden.status("Nothing").unwrap(), SuiteStatus::MissingReceived);
    }

    #[test]
    fn suites_are_deduplicated_and_sorted() {
        let store = MemoryStore::new()
            .with_artifact("b.received", "")
            .with_artifact("b.approved", "")
            .with_artifact("a.approved", "")
            .with_artifact("notes.txt", "")
            .with_artifact(".received", "");
        let golden = GoldenMaster::new(store);

        assert_eq!(golden.suites().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn custom_extensions_are_honoured() {
        let golden = GoldenMaster::new(MemoryStore::new()).with_extensions("out", "golden");
        let _ = golden.persist_and_compare("Sum", &lines(&["x"]));
        assert!(golden.store().get("Sum.out").is_some());
        assert!(golden.store().get("Sum.golden").is_some());
    }

    #[test]
    fn invalid_suite_names_touch_nothing() {
        let golden = GoldenMaster::new(MemoryStore::new());
        for name in ["", ".", "..", "../escape", "a/b", "a\\b"] {
            assert!(matches!(
                golden.persist_and_compare(name, &[]).unwrap_err(),
                ApprovalError::InvalidSuiteName(_)
            ));
        }
        assert!(golden.store().keys().unwrap().is_empty());
    }

    #[test]
    fn reads_reject_names_outside_the_directory() {
        let golden = GoldenMaster::new(MemoryStore::new().with_artifact("../x.received", "leak"));
        assert!(matches!(
            golden.read_received("../x").unwrap_err(),
            ApprovalError::InvalidSuiteName(_)
        ));
        assert!(matches!(
            golden.read_approved("../x").unwrap_err(),
            ApprovalError::InvalidSuiteName(_)
        ));
    }

    #[test]
    fn flush_received_does_not_create_approved() {
        let golden = GoldenMaster::new(MemoryStore::new());
        golden.flush_received("Partial", &lines(&["a"])).unwrap();
        assert_eq!(golden.store().get("Partial.received").as_deref(), Some("a"));
        assert!(golden.store().get("Partial.approved").is_none());
    }
}
