//! Error type shared by evaluation and reductions

use thiserror::Error;

/// Canonical result for the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Runtime failures of evaluation and reduction calls
///
/// Every variant is returned before any destination element is written.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Operand extents do not agree
    #[error("Dimension mismatch: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        /// Extents (rows, cols) required by the other operand or destination
        expected: (usize, usize),
        /// Extents (rows, cols) actually supplied
        found: (usize, usize),
    },

    /// A reduction without a neutral element was applied to an empty operand
    #[error("Empty input: {0} is undefined on an empty operand")]
    EmptyInput(&'static str),

    /// Malformed storage description or operand kind
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A forced policy cannot be honoured by the operands
    #[error("Unsupported policy {policy}: {reason}")]
    UnsupportedPolicy {
        /// Name of the requested policy
        policy: &'static str,
        /// Which requirement failed
        reason: &'static str,
    },
}
