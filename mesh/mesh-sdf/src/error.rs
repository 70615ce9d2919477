//! Error types for distance sampling.

use thiserror::Error;

/// Result type for SDF operations.
pub type SdfResult<T> = Result<T, SdfError>;

/// Errors that can occur during distance sampling.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SdfError {
    /// Mesh has no faces to measure against.
    #[error("mesh is empty")]
    EmptyMesh,

    /// Grid has a zero dimension or a non-positive voxel size.
    #[error("invalid grid: dims {dims:?}, dx {dx}")]
    InvalidGrid {
        /// Requested dimensions.
        dims: [usize; 3],
        /// Requested voxel size.
        dx: f64,
    },

    /// Voxel count overflows `usize`.
    #[error("grid {dims:?} is too large to allocate")]
    GridTooLarge {
        /// Requested dimensions.
        dims: [usize; 3],
    },

    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {vertex}, mesh has {vertex_count}")]
    IndexOutOfRange {
        /// Offending face.
        face: usize,
        /// Offending vertex index.
        vertex: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },
}
