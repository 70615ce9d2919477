//! Error types for mesh repair operations.

use thiserror::Error;

/// Result type for repair operations.
pub type RepairResult<T> = Result<T, RepairError>;

/// Errors that can occur during mesh repair.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RepairError {
    /// Weld tolerance is negative or not finite.
    #[error("invalid weld epsilon: {0}")]
    InvalidEpsilon(f64),

    /// Degenerate area threshold is negative or not finite.
    #[error("invalid degenerate area threshold: {0}")]
    InvalidAreaThreshold(f64),
}
