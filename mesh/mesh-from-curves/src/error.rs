//! Tube sweep errors.

use thiserror::Error;

/// Result alias for tube sweeps.
pub type CurveResult<T> = Result<T, CurveError>;

/// Why a polyline could not be swept.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CurveError {
    /// Fewer samples than a sweep needs.
    #[error("sweep needs {min} or more points, got {actual}")]
    TooFewPoints {
        /// Required sample count.
        min: usize,
        /// Samples supplied.
        actual: usize,
    },

    /// Radius that is not a positive finite number.
    #[error("tube radius must be positive and finite, got {0}")]
    InvalidRadius(f64),

    /// Cross-section ring with too few points to enclose anything.
    #[error("cross-section needs {min} or more points, got {actual}")]
    TooFewSegments {
        /// Required ring size.
        min: usize,
        /// Ring size requested.
        actual: usize,
    },

    /// All samples coincide.
    #[error("curve has zero length")]
    DegenerateCurve,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_numbers() {
        let err = CurveError::TooFewPoints { min: 2, actual: 1 };
        assert!(err.to_string().contains("got 1"));
        assert!(CurveError::InvalidRadius(-0.5).to_string().contains("-0.5"));
    }
}
