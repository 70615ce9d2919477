//! Signed distance sampling of triangle meshes.
//!
//! Fills a regular voxel grid with signed distances to a triangle mesh:
//! negative inside, positive outside, clamped to a caller-chosen band.
//! The grid is the input to isosurface extraction in `mesh-offset`.
//!
//! - [`DistanceSampler`] - Narrow sampling interface (mesh + grid → values)
//! - [`ClosestTriangleSampler`] - Exact distance, winding-number sign
//! - [`GridSpec`] - Grid origin, voxel size and dimensions
//!
//! # Example
//!
//! ```
//! use mesh_sdf::{ClosestTriangleSampler, DistanceSampler, GridSpec, signed_distance};
//! use mesh_types::IndexedMesh;
//! use nalgebra::Point3;
//!
//! let mut mesh = IndexedMesh::new();
//! mesh.push_triangle(
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(10.0, 0.0, 0.0),
//!     Point3::new(5.0, 10.0, 0.0),
//! );
//!
//! let d = signed_distance(Point3::new(5.0, 5.0, 2.0), &mesh).unwrap();
//! assert!((d - 2.0).abs() < 1e-12);
//!
//! let grid = GridSpec::new(Point3::new(0.0, 0.0, -1.0), 0.5, [20, 20, 5]);
//! let values = ClosestTriangleSampler.sample(&mesh, &grid, 1.0).unwrap();
//! assert_eq!(values.len(), 20 * 20 * 5);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod query;
mod sampler;

pub use error::{SdfError, SdfResult};
pub use query::{closest_point_on_segment, closest_point_on_triangle, solid_angle};
pub use sampler::{
    ClosestTriangleSampler, DistanceSampler, GridSpec, signed_distance, winding_number,
};
