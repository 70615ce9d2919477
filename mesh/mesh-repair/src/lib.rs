//! Welding, cleanup and validation for triangle meshes.
//!
//! The geometry stages of the mesher emit triangle soups. This crate turns
//! them into indexed meshes and checks the result:
//!
//! - Vertex welding (merge vertices within a tolerance)
//! - Degenerate and invalid face removal
//! - Unreferenced vertex compaction
//! - Face and area-weighted vertex normals
//! - Validation (watertight, manifold, orientation, volume)
//!
//! # Example
//!
//! ```
//! use mesh_types::IndexedMesh;
//! use mesh_repair::{RepairParams, compute_vertex_normals, repair_mesh, validate_mesh};
//! use nalgebra::Point3;
//!
//! let p = [
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(0.0, 0.0, 1.0),
//! ];
//! let mut mesh = IndexedMesh::new();
//! mesh.push_triangle(p[0], p[2], p[1]);
//! mesh.push_triangle(p[0], p[1], p[3]);
//! mesh.push_triangle(p[1], p[2], p[3]);
//! mesh.push_triangle(p[2], p[0], p[3]);
//!
//! repair_mesh(&mut mesh, &RepairParams::default()).unwrap();
//! compute_vertex_normals(&mut mesh);
//!
//! assert_eq!(mesh.vertices.len(), 4);
//! assert!(validate_mesh(&mesh).is_closed());
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod adjacency;
mod error;
mod normals;
mod repair;
mod validate;

pub use adjacency::MeshAdjacency;
pub use error::{RepairError, RepairResult};
pub use normals::{compute_vertex_normals, face_normals, vertex_normals};
pub use repair::{
    RepairParams, RepairSummary, remove_degenerate_triangles, remove_invalid_faces,
    remove_unreferenced_vertices, repair_mesh, weld_vertices,
};
pub use validate::{MeshReport, ValidationOptions, validate_mesh, validate_mesh_with_options};
