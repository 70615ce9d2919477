//! Skeleton shapes for surface meshing.
//!
//! A skeleton is the compact abstraction a user sketches: either a 1-D space
//! curve or a 2-D control-point sheet. The meshing kernel thickens it into a
//! closed triangle mesh.
//!
//! - [`SkeletonCurve`] - Ordered control points defining a piecewise path
//! - [`SkeletonSheet`] - A control-point grid defining a parametric patch
//! - [`Skeleton`] - Closed tagged variant over the two
//!
//! # Example
//!
//! ```
//! use skeleton_types::{Skeleton, SkeletonCurve};
//! use nalgebra::Point3;
//!
//! let curve = SkeletonCurve::new(vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(0.0, 0.0, 1.0),
//! ]);
//! assert!((curve.arc_length() - 1.0).abs() < 1e-12);
//!
//! let samples = curve.resample(5);
//! assert_eq!(samples.len(), 5);
//!
//! let skeleton = Skeleton::from(curve);
//! assert!(skeleton.as_curve().is_some());
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod curve;
mod error;
mod sheet;

pub use curve::SkeletonCurve;
pub use error::{SkeletonError, SkeletonResult};
pub use sheet::{DEFAULT_GRID_SIZE, Quad, SkeletonSheet, SurfaceSample};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A skeleton primitive: either a curve or a sheet.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Skeleton {
    /// A 1-D space curve.
    Curve(SkeletonCurve),
    /// A 2-D parametric sheet.
    Sheet(SkeletonSheet),
}

impl Skeleton {
    /// Short name of the primitive kind, used in log fields.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Curve(_) => "curve",
            Self::Sheet(_) => "sheet",
        }
    }

    /// The curve, if this skeleton is one.
    #[must_use]
    pub fn as_curve(&self) -> Option<&SkeletonCurve> {
        match self {
            Self::Curve(curve) => Some(curve),
            Self::Sheet(_) => None,
        }
    }

    /// The sheet, if this skeleton is one.
    #[must_use]
    pub fn as_sheet(&self) -> Option<&SkeletonSheet> {
        match self {
            Self::Sheet(sheet) => Some(sheet),
            Self::Curve(_) => None,
        }
    }
}

impl From<SkeletonCurve> for Skeleton {
    fn from(curve: SkeletonCurve) -> Self {
        Self::Curve(curve)
    }
}

impl From<SkeletonSheet> for Skeleton {
    fn from(sheet: SkeletonSheet) -> Self {
        Self::Sheet(sheet)
    }
}
