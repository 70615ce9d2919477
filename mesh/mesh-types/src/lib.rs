//! Mesh storage shared by the meshing stages.
//!
//! - [`IndexedMesh`] - Vertices plus index triples; also used for soups
//! - [`Vertex`] - Position with an optional shading normal
//! - [`Triangle`] - A face resolved to positions
//! - [`Aabb`] - Axis-aligned bounds
//!
//! Proxy soups, extracted isosurfaces and finished meshes all live in an
//! [`IndexedMesh`]; only how the faces share vertices differs.
//!
//! Faces wind counter-clockwise seen from outside, so a closed mesh has
//! positive [`IndexedMesh::signed_volume`].
//!
//! # Example
//!
//! ```
//! use mesh_types::{IndexedMesh, MeshBounds, Point3};
//!
//! let mut soup = IndexedMesh::new();
//! soup.push_triangle(
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! );
//!
//! assert_eq!(soup.vertex_count(), 3);
//! assert_eq!(soup.bounds().max, Point3::new(1.0, 1.0, 0.0));
//! ```

#![warn(missing_docs)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod bounds;
mod mesh;
mod triangle;
mod vertex;

pub use bounds::Aabb;
pub use mesh::{IndexedMesh, MeshBounds};
pub use triangle::Triangle;
pub use vertex::Vertex;

pub use nalgebra::{Point3, Vector3};
