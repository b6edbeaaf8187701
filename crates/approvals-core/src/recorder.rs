//! Ordered, append-only trace of one approval run.

use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to a run's trace.
///
/// Cloning the handle shares the same underlying log, which is how spies
/// built for a run write into that run's trace. The handle is `!Send`: a
/// trace belongs to the thread that started the run.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    lines: Rc<RefCell<Vec<String>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pre-rendered line.
    pub fn record(&self, line: impl Into<String>) {
        self.lines.borrow_mut().push(line.into());
    }

    /// Append `{label}: {json(value)}`.
    pub fn record_value(&self, label: &str, value: &Value) {
        self.record(format!("{}: {}", label, render(value)));
    }

    pub fn len(&self) -> usize {
        self.lines.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.borrow().is_empty()
    }

    /// Copy of the lines recorded so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    /// Take every recorded line, leaving the trace empty.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.borrow_mut())
    }

    /// Discard every recorded line.
    pub fn clear(&self) {
        self.lines.borrow_mut().clear();
    }
}

/// Compact JSON text for a traced value.
pub fn render(value: &Value) -> String {
    value.to_string()
}
