//! Thicken skeleton curves and sheets into closed triangle meshes.
//!
//! Two entry points exist. The offset surface thickens any skeleton through
//! a signed distance field of a proxy soup. The regular surface sweeps a
//! tube along curves, wraps flat sheets in an oriented box and falls back to
//! the offset surface for other sheets. Both end in the same assembler,
//! which welds the soup, drops degenerate faces and computes normals.
//!
//! - [`SkeletonMesher`] - Entry points and pluggable numerical collaborators
//! - [`select_pipeline`] - Which pipeline a request runs
//! - [`build_proxy`] - Distance-field seeds
//! - [`offset_surface`] - Distance field and isosurface
//! - [`oriented_box`] - Box around a flat sheet
//! - [`assemble`] - Welding and normals
//!
//! # Quick Start
//!
//! ```
//! use nalgebra::Point3;
//! use mesh_repair::validate_mesh;
//! use skeleton_mesher::{OffsetParameters, SkeletonMesher, SurfaceMode};
//! use skeleton_types::{Skeleton, SkeletonCurve};
//!
//! let curve = Skeleton::from(SkeletonCurve::new(vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(0.0, 0.0, 1.0),
//! ]));
//!
//! let mesher = SkeletonMesher::default();
//! let (out, _) = mesher
//!     .mesh_skeleton(&curve, &OffsetParameters::new(0.1), SurfaceMode::Regular)
//!     .unwrap();
//!
//! assert!(validate_mesh(&out.mesh).is_closed());
//! assert!((out.bounds.max.x - 0.1).abs() < 1e-9);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod assemble;
mod box_builder;
mod config;
mod dispatch;
mod error;
mod implicit;
mod model;
mod proxy;

pub use assemble::{AssemblyReport, OutputMesh, Shading, assemble};
pub use box_builder::oriented_box;
pub use config::{MesherConfig, OffsetParameters, SurfaceMode, ThicknessLevel, TubeSampling};
pub use dispatch::{MeshingOutcome, Pipeline, SkeletonMesher, select_pipeline, shading_for};
pub use error::{MesherError, MesherResult};
pub use implicit::offset_surface;
pub use model::{MeshOutput, Model, SkeletonNode, export_filename};
pub use proxy::{ProxyMesh, build_proxy, curve_proxy, sheet_proxy};
