//! Generate triangle meshes from curves.
//!
//! - **Frames**: [`FramePropagator`] with a rotation-minimizing
//!   implementation, [`DoubleReflection`]
//! - **Tubes**: [`capped_tube`] sweeps a ring along the frames and closes
//!   both ends with round or flat caps
//!
//! # Quick Start
//!
//! ```
//! use mesh_from_curves::{CapStyle, DoubleReflection, TubeConfig, capped_tube};
//! use nalgebra::Point3;
//!
//! let points = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(0.0, 0.0, 5.0),
//!     Point3::new(0.0, 3.0, 10.0),
//! ];
//!
//! let config = TubeConfig::default()
//!     .with_radius(0.5)
//!     .with_radial_segments(4)
//!     .with_caps(CapStyle::Flat);
//!
//! let mesh = capped_tube(&points, &config, &DoubleReflection).unwrap();
//! assert!(!mesh.faces.is_empty());
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod frame;
mod tube;

pub use error::{CurveError, CurveResult};
pub use frame::{DoubleReflection, Frame, FramePropagator};
pub use tube::{CapStyle, TubeConfig, capped_tube};
