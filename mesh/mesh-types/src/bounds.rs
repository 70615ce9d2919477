//! Axis-aligned bounds.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis-aligned box between `min` and `max`.
///
/// The default box is empty (`min = +∞`, `max = -∞`) so it can accumulate
/// points with [`Aabb::expand_to_include`].
///
/// ```
/// use mesh_types::{Aabb, Point3};
///
/// let mut b = Aabb::default();
/// assert!(b.is_empty());
/// b.expand_to_include(&Point3::new(1.0, 2.0, 3.0));
/// b.expand_to_include(&Point3::new(-1.0, 0.0, 3.0));
/// assert_eq!(b.size().x, 2.0);
/// assert_eq!(b.volume(), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Lower corner.
    pub min: Point3<f64>,
    /// Upper corner.
    pub max: Point3<f64>,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb {
    /// Box spanning two corners given in any order.
    #[must_use]
    pub fn new(a: Point3<f64>, b: Point3<f64>) -> Self {
        Self {
            min: a.inf(&b),
            max: a.sup(&b),
        }
    }

    /// The inside-out box that contains nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: Point3::from(Vector3::repeat(f64::INFINITY)),
            max: Point3::from(Vector3::repeat(f64::NEG_INFINITY)),
        }
    }

    /// Tight box around `points`; empty if there are none.
    #[must_use]
    pub fn from_points<'a>(points: impl Iterator<Item = &'a Point3<f64>>) -> Self {
        points.fold(Self::empty(), |mut b, p| {
            b.expand_to_include(p);
            b
        })
    }

    /// Whether `min` exceeds `max` on some axis.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        (0..3).any(|i| self.min[i] > self.max[i])
    }

    /// `max - min`.
    #[inline]
    #[must_use]
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Enclosed volume, zero when empty.
    #[must_use]
    pub fn volume(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.size().product()
        }
    }

    /// Grow to cover `point`.
    pub fn expand_to_include(&mut self, point: &Point3<f64>) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    /// Copy grown by `margin` on all six sides.
    #[must_use]
    pub fn expanded(&self, margin: f64) -> Self {
        let m = Vector3::repeat(margin);
        Self {
            min: self.min - m,
            max: self.max + m,
        }
    }

    /// Squared distance from `point` to the box; zero inside.
    #[must_use]
    pub fn distance_squared(&self, point: &Point3<f64>) -> f64 {
        let below = self.min - point;
        let above = point - self.max;
        below.sup(&above).sup(&Vector3::zeros()).norm_squared()
    }
}
