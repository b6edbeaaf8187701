//! Error types for approval runs and golden-master storage

use serde_json::Value;
use thiserror::Error;

pub type ApprovalResult<T> = Result<T, ApprovalError>;

/// Whether the approved artifact had any content when a comparison failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovedState {
    /// Nothing has been approved yet for this suite.
    Empty,
    /// An accepted reference exists and the new trace differs from it.
    Populated,
}

impl ApprovedState {
    pub fn of(approved: &str) -> Self {
        if approved.is_empty() {
            Self::Empty
        } else {
            Self::Populated
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            Self::Empty => {
                "approved output seems to be empty, please copy the received output into it"
            }
            Self::Populated => {
                "approved output is not empty, you may have broken the golden master"
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ApprovalError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("function under test failed in suite '{suite}' for {}: {source}", render_combination(.combination))]
    FunctionUnderTest {
        suite: String,
        combination: Vec<Value>,
        #[source]
        source: anyhow::Error,
    },

    #[error("io error at {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Received output does not match approved output ({})", .state.hint())]
    Mismatch {
        suite: String,
        state: ApprovedState,
        received: String,
        approved: String,
    },

    #[error("invalid suite name: '{0}'")]
    InvalidSuiteName(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ApprovalError {
    pub fn io(location: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            location: location.into(),
            source,
        }
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// True for the expected, user-facing failure (as opposed to a broken run).
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::Mismatch { .. })
    }
}

fn render_combination(combination: &[Value]) -> String {
    Value::Array(combination.to_vec()).to_string()
}
