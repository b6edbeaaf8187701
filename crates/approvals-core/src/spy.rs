//! Call interceptors that record their invocations into a run's trace.

use crate::error::ApprovalResult;
use crate::recorder::{render, Recorder};
use serde::Serialize;
use serde_json::Value;
use std::cell::Cell;
use tracing::trace;

/// What a spy yields when called.
///
/// `Absent` is distinct from `Value(Value::Null)`, `Value(json!(0))` and
/// friends: every configured value is recorded and returned, however falsy.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SpyReturn {
    #[default]
    Absent,
    Value(Value),
}

impl From<Option<Value>> for SpyReturn {
    fn from(value: Option<Value>) -> Self {
        match value {
            Some(v) => SpyReturn::Value(v),
            None => SpyReturn::Absent,
        }
    }
}

/// A stand-in for a collaborator of the function under test.
#[derive(Debug)]
pub struct Spy {
    name: String,
    returns: SpyReturn,
    recorder: Recorder,
    calls: Cell<usize>,
}

impl Spy {
    pub fn new(name: impl Into<String>, recorder: Recorder) -> Self {
        Self {
            name: name.into(),
            returns: SpyReturn::Absent,
            recorder,
            calls: Cell::new(0),
        }
    }

    /// Configure the value handed back on every call.
    pub fn returning(mut self, value: Value) -> Self {
        self.returns = SpyReturn::Value(value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn returns(&self) -> &SpyReturn {
        &self.returns
    }

    /// Number of times this spy has been invoked.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// Record a call with positional arguments and yield the configured value.
    pub fn call(&self, args: &[Value]) -> Option<Value> {
        self.calls.set(self.calls.get() + 1);
        trace!(spy = %self.name, "spy invoked");

        self.recorder.record(format!(
            "call to {}: {}",
            self.name,
            render(&Value::Array(args.to_vec()))
        ));

        match &self.returns {
            SpyReturn::Absent => None,
            SpyReturn::Value(value) => {
                self.recorder.record_value("and returns", value);
                Some(value.clone())
            }
        }
    }

    /// Like [`Spy::call`] for typed arguments.
    ///
    /// A sequence serializes to the positional argument list; any other value
    /// is treated as a single argument.
    pub fn call_with<A: Serialize + ?Sized>(&self, args: &A) -> ApprovalResult<Option<Value>> {
        let args = match serde_json::to_value(args)? {
            Value::Array(items) => items,
            single => vec![single],
        };
        Ok(self.call(&args))
    }
}
