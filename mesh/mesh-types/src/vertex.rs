//! Mesh vertices.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Position plus the shading normal the assembler fills in.
///
/// Builders only ever set the position; `normal` stays `None` until faces
/// are final.
///
/// ```
/// use mesh_types::{Point3, Vertex};
///
/// let v = Vertex::from_coords(1.0, 2.0, 3.0);
/// assert_eq!(v, Vertex::from(Point3::new(1.0, 2.0, 3.0)));
/// assert!(v.normal.is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vertex {
    /// World-space position.
    pub position: Point3<f64>,
    /// Unit area-weighted normal of the incident faces.
    pub normal: Option<Vector3<f64>>,
}

impl Vertex {
    /// Vertex at `position` without a normal.
    #[inline]
    #[must_use]
    pub const fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            normal: None,
        }
    }

    /// Vertex at `(x, y, z)`.
    #[inline]
    #[must_use]
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }
}

impl From<Point3<f64>> for Vertex {
    fn from(position: Point3<f64>) -> Self {
        Self::new(position)
    }
}
