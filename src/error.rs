//! Executor error types

use thiserror::Error;

use crate::ty::TypeLabel;

/// Result type for executor operations
pub type ExecResult<T> = Result<T, ExecError>;

/// Errors raised while building, running or tearing down a plan tree.
///
/// Nodes never wrap the errors of their children: whatever a child returns
/// travels up the call chain as-is.
#[derive(Debug, Error)]
pub enum ExecError {
    /// A node (or an external resource it needs) could not be set up.
    #[error("failed to initialize {node}: {reason}")]
    Init { node: &'static str, reason: String },

    /// The interrupt check fired while a node was producing a tuple.
    #[error("canceling statement due to user request")]
    Cancelled,

    /// Failure reported by an external tuple source.
    #[error("tuple source error: {0}")]
    Source(String),

    #[error("{0} node used after close")]
    NodeClosed(&'static str),

    #[error("executor has not been started")]
    NotStarted,

    #[error("executor has already been started")]
    AlreadyStarted,

    #[error("executor was started for explain only")]
    ExplainOnly,

    #[error("type mismatch in column {column}: expected {expected}, got {got}")]
    TypeMismatch {
        column: String,
        expected: TypeLabel,
        got: TypeLabel,
    },

    #[error("row has {got} columns but the tuple descriptor has {expected}")]
    ArityMismatch { expected: usize, got: usize },

    #[error("tuple has {natts} columns, at most {max} are supported")]
    TooManyColumns { natts: usize, max: usize },

    #[error("column index {index} out of bounds (tuple has {natts} columns)")]
    ColumnIndexOutOfBounds { index: usize, natts: usize },

    #[error("encoding error: {0}")]
    Encoding(#[from] std::io::Error),

    #[error("corrupted tuple: {0}")]
    Corrupted(String),

    #[error("syntax error: {0}")]
    Parse(String),

    /// A plan file given on the command line could not be read.
    #[error("cannot read plan file {path}: {source}")]
    PlanFile { path: String, source: std::io::Error },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ExecError {
    pub fn init(node: &'static str, reason: impl Into<String>) -> ExecError {
        ExecError::Init {
            node,
            reason: reason.into(),
        }
    }
}
