//! Error types for skeleton construction.

use thiserror::Error;

/// Result type for skeleton operations.
pub type SkeletonResult<T> = Result<T, SkeletonError>;

/// Errors that can occur while building a skeleton.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SkeletonError {
    /// Not enough control points for the requested shape.
    #[error("insufficient points: need at least {required}, got {actual}")]
    InsufficientPoints {
        /// Minimum required points.
        required: usize,
        /// Actual number of points provided.
        actual: usize,
    },

    /// A sheet's control grid has rows of different lengths.
    #[error("control grid row {row} has {actual} points, expected {expected}")]
    RaggedGrid {
        /// Index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        actual: usize,
    },

    /// A control point has a NaN or infinite coordinate.
    #[error("control point {index} is not finite")]
    NonFinitePoint {
        /// Flat index of the offending point.
        index: usize,
    },
}
