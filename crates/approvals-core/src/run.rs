//! Combination-driven approval runs.

use crate::combinations;
use crate::config::ApprovalConfig;
use crate::error::{ApprovalError, ApprovalResult};
use crate::golden::{validate_suite_name, GoldenMaster};
use crate::recorder::Recorder;
use crate::spy::Spy;
use crate::store::{FsStore, GoldenStore};
use serde::Serialize;
use serde_json::Value;
use std::convert::Infallible;
use tracing::{debug, info, warn};

/// Entry point: owns the golden-master protocol and hands out runs.
#[derive(Debug)]
pub struct Approvals<S: GoldenStore = FsStore> {
    golden: GoldenMaster<S>,
}

impl Approvals<FsStore> {
    pub fn new(config: &ApprovalConfig) -> ApprovalResult<Self> {
        config.validate()?;
        Ok(Self {
            golden: GoldenMaster::from_config(config),
        })
    }

    pub fn from_env() -> ApprovalResult<Self> {
        Self::new(&ApprovalConfig::from_env())
    }
}

impl<S: GoldenStore> Approvals<S> {
    pub fn with_golden_master(golden: GoldenMaster<S>) -> Self {
        Self { golden }
    }

    pub fn golden_master(&self) -> &GoldenMaster<S> {
        &self.golden
    }

    /// Start a run for `suite` with an empty trace.
    ///
    /// Runs are independent of each other, but two runs with the same suite
    /// name share artifacts: keep suite names unique per storage root.
    pub fn run(&self, suite: impl Into<String>) -> ApprovalResult<ApprovalRun<'_, S>> {
        let suite = suite.into();
        validate_suite_name(&suite)?;
        Ok(ApprovalRun {
            suite,
            recorder: Recorder::new(),
            golden: &self.golden,
        })
    }
}

/// One approval run: a suite name and the trace being recorded for it.
#[derive(Debug)]
pub struct ApprovalRun<'a, S: GoldenStore> {
    suite: String,
    recorder: Recorder,
    golden: &'a GoldenMaster<S>,
}

impl<'a, S: GoldenStore> ApprovalRun<'a, S> {
    pub fn suite(&self) -> &str {
        &self.suite
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    /// A spy that records its calls into this run and yields nothing.
    pub fn spy(&self, name: impl Into<String>) -> Spy {
        Spy::new(name, self.recorder.clone())
    }

    /// A spy that records its calls into this run and yields `value`.
    pub fn spy_returning(&self, name: impl Into<String>, value: Value) -> Spy {
        self.spy(name).returning(value)
    }

    /// Call `f` with every combination of `domains`, record each result and
    /// compare the trace with the approved golden master.
    pub fn approve_combinations<F, R>(self, mut f: F, domains: &[Vec<Value>]) -> ApprovalResult<()>
    where
        F: FnMut(&[Value]) -> R,
        R: Serialize,
    {
        self.try_approve_combinations(|args| Ok::<R, Infallible>(f(args)), domains)
    }

    /// Like [`ApprovalRun::approve_combinations`] for a fallible function.
    ///
    /// The first `Err` stops the run. Whatever was recorded up to that point
    /// is written to the received artifact and nothing is compared.
    pub fn try_approve_combinations<F, R, E>(
        self,
        mut f: F,
        domains: &[Vec<Value>],
    ) -> ApprovalResult<()>
    where
        F: FnMut(&[Value]) -> Result<R, E>,
        R: Serialize,
        E: Into<anyhow::Error>,
    {
        info!(
            suite = %self.suite,
            combinations = combinations::count(domains),
            "starting approval run"
        );

        let guard = FlushOnAbort::new(&self);
        for combination in combinations::enumerate(domains) {
            let result = f(combination.as_slice()).map_err(|e| ApprovalError::FunctionUnderTest {
                suite: self.suite.clone(),
                combination: combination.clone(),
                source: e.into(),
            })?;
            let value = serde_json::to_value(result)?;
            self.recorder.record_value("return value", &value);
        }
        guard.disarm();

        let lines = self.recorder.take();
        debug!(suite = %self.suite, lines = lines.len(), "trace complete");
        self.golden.persist_and_compare(&self.suite, &lines)
    }
}

/// Flushes the partial trace if a run exits before reaching the comparison,
/// including by unwinding out of the function under test.
struct FlushOnAbort<'r, 'a, S: GoldenStore> {
    run: &'r ApprovalRun<'a, S>,
    armed: bool,
}

impl<'r, 'a, S: GoldenStore> FlushOnAbort<'r, 'a, S> {
    fn new(run: &'r ApprovalRun<'a, S>) -> Self {
        Self { run, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl<S: GoldenStore> Drop for FlushOnAbort<'_, '_, S> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let lines = self.run.recorder.take();
        match self.run.golden.flush_received(&self.run.suite, &lines) {
            Ok(()) => warn!(
                suite = %self.run.suite,
                lines = lines.len(),
                "approval run aborted, partial trace written to received output"
            ),
            Err(e) => warn!(
                suite = %self.run.suite,
                error = %e,
                "approval run aborted and the partial trace could not be written"
            ),
        }
    }
}
