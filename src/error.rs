//! Error type shared by every stage of a benchmark run.

use crate::session::SessionState;
use std::fmt;
use std::path::PathBuf;

/// Which side of the interpreter a tensor lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorKind {
    Input,
    Output,
}

impl fmt::Display for TensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TensorKind::Input => f.write_str("input"),
            TensorKind::Output => f.write_str("output"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("unknown model '{name}': the model name should be one of {expected}")]
    UnknownScenario { name: String, expected: String },

    #[error("model file not found: {}", path.display())]
    ModelNotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{kind} tensor index {index} out of range ({count} available)")]
    TensorIndex {
        kind: TensorKind,
        index: usize,
        count: usize,
    },

    #[error("{kind} tensor {index} holds {expected} bytes but the buffer has {actual}")]
    SizeMismatch {
        kind: TensorKind,
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("{kind} tensor '{name}' is not supported: {detail}")]
    UnsupportedTensor {
        kind: TensorKind,
        name: String,
        detail: String,
    },

    #[error("input tensor {index} was not bound before invoke")]
    UnboundInput { index: usize },

    #[error("cannot {op} a session that is {state}")]
    InvalidState { op: &'static str, state: SessionState },

    #[error("inference failed: {0}")]
    Invoke(String),

    #[error("benchmark needs at least one iteration")]
    ZeroIterations,

    #[error("inference runtime: {0}")]
    Runtime(#[from] ort::Error),
}

pub type Result<T> = std::result::Result<T, HarnessError>;
