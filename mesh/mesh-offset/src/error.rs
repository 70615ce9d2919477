//! Error types for offset surface extraction.

use thiserror::Error;

/// Result type for offset operations.
pub type OffsetResult<T> = Result<T, OffsetError>;

/// Errors that can occur while building an offset surface.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OffsetError {
    /// Source mesh has no faces.
    #[error("mesh is empty")]
    EmptyMesh,

    /// Offset distance is NaN or infinite.
    #[error("invalid offset distance: {0}")]
    InvalidDistance(f64),

    /// Cell size is not a positive finite number.
    #[error("invalid cell size: {0}")]
    InvalidCellSize(f64),

    /// The padded grid would exceed the configured voxel budget.
    #[error("grid {dims:?} needs {voxels} voxels, limit is {limit}")]
    GridTooLarge {
        /// Grid dimensions that were requested.
        dims: [usize; 3],
        /// Voxel count of that grid.
        voxels: usize,
        /// Configured limit.
        limit: usize,
    },

    /// A sample buffer does not match the grid it is meant for.
    #[error("expected {expected} samples, got {actual}")]
    SampleCountMismatch {
        /// Voxel count of the grid.
        expected: usize,
        /// Length of the buffer.
        actual: usize,
    },

    /// The field never crosses the iso value, so there is no surface.
    #[error("isosurface at {iso} is empty")]
    EmptyIsosurface {
        /// Requested iso value.
        iso: f64,
    },

    /// Distance sampling failed.
    #[error("SDF computation failed: {0}")]
    Sdf(#[from] mesh_sdf::SdfError),
}
