//! Errors raised while loading inputs and running queries.

use std::io;

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, CfpqError>;

/// Represents a failure of loading a grammar or a graph, or of indexing a matrix.
///
/// None of these are recoverable by retrying: every computation in this crate is
/// deterministic.
#[derive(Debug, Error)]
pub enum CfpqError {
    /// A production is not in Chomsky Normal Form, or the start symbol is not
    /// a nonterminal of the grammar.
    #[error("grammar format error at line {line}: {reason}")]
    GrammarFormat {
        /// Line where the error happened. One-indexed, zero when the grammar was
        /// not read from text.
        line: u32,
        /// Human-readable reason for the error.
        reason: String,
    },
    /// A line of an edge list is not of the form `<from> <label> <to>`.
    #[error("graph format error at line {line}: {reason}")]
    GraphFormat {
        /// One-indexed line.
        line: u32,
        /// Human-readable reason for the error.
        reason: String,
    },
    /// A vertex index falls outside `[0, size)`.
    #[error("vertex index {index} out of range for matrices of size {size}")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Dimension of the matrices.
        size: usize,
    },
    /// The configured deadline passed before the fixed point was reached.
    #[error("deadline exceeded after {passes} passes")]
    DeadlineExceeded {
        /// Number of complete passes performed.
        passes: usize,
    },
    /// Reading an input file failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl CfpqError {
    pub(crate) fn grammar(line: u32, reason: impl Into<String>) -> Self {
        CfpqError::GrammarFormat {
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn graph(line: u32, reason: impl Into<String>) -> Self {
        CfpqError::GraphFormat {
            line,
            reason: reason.into(),
        }
    }
}
