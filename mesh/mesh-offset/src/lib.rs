//! Offset surfaces through sampled distance fields.
//!
//! The offset process works as follows:
//! 1. Size a voxel grid around the source mesh bounds
//! 2. Sample the signed distance to the source at every voxel
//! 3. Extract the level set at the offset distance
//!
//! Positive distances grow the surface outward; a zero-area source such as
//! a polyline ribbon becomes a rounded tube. Both the sampler and the
//! extractor sit behind traits ([`mesh_sdf::DistanceSampler`],
//! [`IsosurfaceExtractor`]) so either can be swapped.
//!
//! # Example
//!
//! ```
//! use mesh_offset::{OffsetConfig, offset_mesh};
//! use mesh_types::IndexedMesh;
//! use nalgebra::Point3;
//!
//! let mut mesh = IndexedMesh::new();
//! mesh.push_triangle(
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! );
//!
//! let slab = offset_mesh(&mesh, 0.1, &OffsetConfig::preview()).unwrap();
//! assert!(slab.signed_volume() > 0.0);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod grid;
mod marching_tetrahedra;
mod offset;

pub use error::{OffsetError, OffsetResult};
pub use grid::{ScalarGrid, grid_for_bounds};
pub use marching_tetrahedra::{IsosurfaceExtractor, MarchingTetrahedra};
pub use offset::{OffsetConfig, offset_mesh, offset_mesh_with};
